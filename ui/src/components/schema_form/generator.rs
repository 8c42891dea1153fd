//! Main Schema Form Component

use leptos::prelude::*;
use leptos::web_sys;

use super::fields::SchemaField;
use super::types::*;
use crate::types::{AgentConfig, ConfigValue, ObjectSchema};

/// Form over a flat object schema.
///
/// Fields render in schema order. Each edit calls `on_change` with a copy of
/// `config` in which only the edited field differs; the form keeps no state of
/// its own.
#[component]
pub fn SchemaForm(
    /// Schema to render
    schema: ObjectSchema,
    /// Current values, keyed by property name
    #[prop(into)]
    config: Signal<AgentConfig>,
    /// Receives the whole configuration after each edit
    on_change: Callback<AgentConfig>,
) -> impl IntoView {
    let controls = field_controls(&schema);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
    };

    view! {
        <form on:submit=on_submit>
            {controls.into_iter().map(|control| {
                let key = control.key.clone();
                let key_for_value = key.clone();

                let value = Signal::derive(move || {
                    config.with(|c| c.get(&key_for_value).clone())
                });
                let on_field_change = Callback::new(move |next: ConfigValue| {
                    let updated = config.with_untracked(|c| apply_field_edit(c, &key, next));
                    on_change.run(updated);
                });

                view! { <SchemaField control=control value=value on_change=on_field_change /> }
            }).collect_view()}
        </form>
    }
}
