//! Configuration Panel
//!
//! Agent selector, the schema-driven form and the Reload/Save actions.

use leptos::prelude::*;
use leptos::web_sys;

use super::schema_form::SchemaForm;
use crate::session::SessionController;
use crate::types::AgentConfig;

#[component]
pub fn ConfigPanel(
    session: ReadSignal<SessionController>,
    on_agent_change: Callback<String>,
    on_config_change: Callback<AgentConfig>,
    on_save: Callback<()>,
    on_reload: Callback<()>,
) -> impl IntoView {
    // Memos keep the form from rebuilding on unrelated session changes
    let agents = Memo::new(move |_| session.with(|s| s.agents().to_vec()));
    let selected_id = Memo::new(move |_| {
        session.with(|s| s.selected_agent().map(|a| a.id.clone()).unwrap_or_default())
    });
    let schema = Memo::new(move |_| session.with(|s| s.schema().cloned()));
    let is_loading = Memo::new(move |_| session.with(|s| s.is_loading_schema()));
    let config = Memo::new(move |_| session.with(|s| s.config().clone()));
    let is_dirty = Memo::new(move |_| session.with(|s| s.is_dirty()));
    let is_saving = Memo::new(move |_| session.with(|s| s.is_saving()));
    let save_error = Memo::new(move |_| session.with(|s| s.last_save_error().map(ToString::to_string)));

    let on_select = move |ev: web_sys::Event| {
        on_agent_change.run(event_target_value(&ev));
    };

    view! {
        <div class="w-1/3 h-full bg-gray-800 border-r border-gray-700 flex flex-col p-6">
            <header class="mb-6">
                <h1 class="text-2xl font-bold text-white">"Agent Playground"</h1>
                <p class="text-sm text-gray-400">"Configure and test your AI agents in real-time."</p>
            </header>

            <div class="mb-6">
                <label class="block text-sm font-medium text-gray-300 mb-2">"Agent Name"</label>
                <select
                    class="w-full bg-gray-700 border border-gray-600 rounded-md px-3 py-2 text-white focus:outline-none focus:ring-2 focus:ring-indigo-500"
                    prop:value=move || selected_id.get()
                    on:change=on_select
                >
                    {move || agents.get().into_iter().map(|agent| view! {
                        <option value=agent.id.clone()>{agent.name}</option>
                    }).collect_view()}
                </select>
            </div>

            <div class="flex-grow bg-gray-900 rounded-lg p-4 overflow-y-auto">
                <h2 class="text-lg font-semibold text-white mb-4 flex items-center">
                    "Agent Config"
                    {move || is_dirty.get().then(|| view! {
                        <span class="ml-2 text-xs font-normal text-yellow-400">"modified"</span>
                    })}
                </h2>
                {move || {
                    if is_loading.get() {
                        view! {
                            <div class="flex justify-center items-center h-full">
                                <div class="animate-spin rounded-full h-8 w-8 border-b-2 border-indigo-400"></div>
                            </div>
                        }.into_any()
                    } else if let Some(schema) = schema.get() {
                        view! {
                            <SchemaForm schema=schema config=config on_change=on_config_change />
                        }.into_any()
                    } else {
                        view! {
                            <p class="text-gray-500">"Could not load agent configuration schema."</p>
                        }.into_any()
                    }
                }}
            </div>

            {move || save_error.get().map(|error| view! {
                <p class="mt-4 text-sm text-red-400">{error}</p>
            })}

            <div class="mt-6 flex items-center justify-end space-x-4">
                <button
                    class="px-4 py-2 rounded-md text-gray-300 hover:bg-gray-700"
                    on:click=move |_| on_reload.run(())
                >
                    "Reload"
                </button>
                <button
                    class="px-4 py-2 rounded-md bg-indigo-600 hover:bg-indigo-700 text-white font-semibold disabled:bg-gray-600 disabled:cursor-not-allowed"
                    disabled=move || is_saving.get()
                    on:click=move |_| on_save.run(())
                >
                    {move || if is_saving.get() { "Saving..." } else { "Save" }}
                </button>
            </div>
        </div>
    }
}
