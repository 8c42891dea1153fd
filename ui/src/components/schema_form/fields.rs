//! Field Renderers
//!
//! One component per widget kind plus the labelled row wrapping them.

use leptos::prelude::*;
use leptos::web_sys;

use super::types::*;
use crate::types::ConfigValue;

const INPUT_CLASS: &str = "w-full bg-gray-700 border border-gray-600 rounded-md px-3 py-2 text-sm text-white focus:outline-none focus:ring-2 focus:ring-indigo-500";

// ============================================================================
// Field Row
// ============================================================================

/// Label, control and optional helper text for one field
#[component]
pub fn SchemaField(
    control: FieldControl,
    value: Signal<ConfigValue>,
    on_change: Callback<ConfigValue>,
) -> impl IntoView {
    let (label_class, control_class) = if control.inline_label {
        ("text-sm font-medium text-gray-300 mr-3", "inline-flex items-center")
    } else {
        ("block text-sm font-medium text-gray-300 mb-2", "")
    };
    let helper_text = control.helper_text.clone();

    view! {
        <div class="mb-4">
            <label class=label_class>{control.label.clone()}</label>
            <div class=control_class>
                <FieldWidget control=control value=value on_change=on_change />
            </div>
            {helper_text.map(|text| view! {
                <p class="mt-1 text-xs text-gray-500">{text}</p>
            })}
        </div>
    }
}

/// Dispatches to the control chosen for the field
#[component]
pub fn FieldWidget(
    control: FieldControl,
    value: Signal<ConfigValue>,
    on_change: Callback<ConfigValue>,
) -> impl IntoView {
    let id = control.id;
    let widget = control.widget.clone();

    match control.widget {
        WidgetKind::Select { options } => {
            view! { <SelectInput id=id options=options value=value on_change=on_change /> }.into_any()
        }
        WidgetKind::TextArea => {
            view! { <TextAreaInput id=id value=value on_change=on_change /> }.into_any()
        }
        WidgetKind::Toggle => {
            view! { <ToggleInput id=id value=value on_change=on_change /> }.into_any()
        }
        WidgetKind::Slider { minimum, maximum } => {
            view! {
                <SliderInput id=id minimum=minimum maximum=maximum widget=widget value=value on_change=on_change />
            }.into_any()
        }
        WidgetKind::NumberInput { minimum, maximum } => {
            view! {
                <NumberInput id=id minimum=minimum maximum=maximum widget=widget value=value on_change=on_change />
            }.into_any()
        }
        WidgetKind::TextInput => {
            view! { <TextInput id=id value=value on_change=on_change /> }.into_any()
        }
    }
}

// ============================================================================
// Select
// ============================================================================

#[component]
fn SelectInput(
    id: String,
    options: Vec<ConfigValue>,
    value: Signal<ConfigValue>,
    on_change: Callback<ConfigValue>,
) -> impl IntoView {
    let labels: Vec<String> = options.iter().map(ConfigValue::display_text).collect();
    let labels_for_value = labels.clone();

    // Option changes always write text
    let on_select = move |ev: web_sys::Event| {
        on_change.run(ConfigValue::Text(event_target_value(&ev)));
    };

    view! {
        <select
            id=id
            class=INPUT_CLASS
            prop:value=move || selected_option(&labels_for_value, &value.get())
            on:change=on_select
        >
            {labels.into_iter().map(|label| {
                view! { <option value=label.clone()>{label}</option> }
            }).collect_view()}
        </select>
    }
}

// ============================================================================
// Text
// ============================================================================

#[component]
fn TextAreaInput(
    id: String,
    value: Signal<ConfigValue>,
    on_change: Callback<ConfigValue>,
) -> impl IntoView {
    let on_input = move |ev: web_sys::Event| {
        on_change.run(ConfigValue::Text(event_target_value(&ev)));
    };

    view! {
        <textarea
            id=id
            rows=5
            class=INPUT_CLASS
            prop:value=move || value.get().display_text()
            on:input=on_input
        ></textarea>
    }
}

#[component]
fn TextInput(
    id: String,
    value: Signal<ConfigValue>,
    on_change: Callback<ConfigValue>,
) -> impl IntoView {
    let on_input = move |ev: web_sys::Event| {
        on_change.run(ConfigValue::Text(event_target_value(&ev)));
    };

    view! {
        <input
            id=id
            type="text"
            class=INPUT_CLASS
            prop:value=move || value.get().display_text()
            on:input=on_input
        />
    }
}

// ============================================================================
// Toggle
// ============================================================================

#[component]
fn ToggleInput(
    id: String,
    value: Signal<ConfigValue>,
    on_change: Callback<ConfigValue>,
) -> impl IntoView {
    let on_toggle = move |ev: web_sys::Event| {
        on_change.run(ConfigValue::Bool(event_target_checked(&ev)));
    };

    view! {
        <input
            id=id
            type="checkbox"
            class="h-5 w-5 rounded bg-gray-700 border-gray-600 text-indigo-500 focus:ring-indigo-500"
            prop:checked=move || value.get().is_truthy()
            on:change=on_toggle
        />
    }
}

// ============================================================================
// Numeric
// ============================================================================

#[component]
fn SliderInput(
    id: String,
    minimum: f64,
    maximum: f64,
    widget: WidgetKind,
    value: Signal<ConfigValue>,
    on_change: Callback<ConfigValue>,
) -> impl IntoView {
    let on_input = move |ev: web_sys::Event| {
        on_change.run(widget.value_from_input(&event_target_value(&ev)));
    };

    view! {
        <div class="flex items-center space-x-3">
            <input
                id=id
                type="range"
                min=minimum.to_string()
                max=maximum.to_string()
                step=SLIDER_STEP.to_string()
                class="w-full accent-indigo-500"
                prop:value=move || value.get().display_text()
                on:input=on_input
            />
            <span class="w-12 text-right text-sm font-mono text-gray-300">
                {move || format_slider_value(value.get().to_number())}
            </span>
        </div>
    }
}

#[component]
fn NumberInput(
    id: String,
    minimum: Option<f64>,
    maximum: Option<f64>,
    widget: WidgetKind,
    value: Signal<ConfigValue>,
    on_change: Callback<ConfigValue>,
) -> impl IntoView {
    let on_input = move |ev: web_sys::Event| {
        on_change.run(widget.value_from_input(&event_target_value(&ev)));
    };

    // Only set min/max attributes when they have values
    let min_attr = minimum.map(|v| v.to_string());
    let max_attr = maximum.map(|v| v.to_string());

    view! {
        <input
            id=id
            type="number"
            min=min_attr
            max=max_attr
            class=INPUT_CLASS
            prop:value=move || value.get().display_text()
            on:input=on_input
        />
    }
}
