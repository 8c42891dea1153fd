use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

mod api;
mod components;
mod error;
mod session;
mod types;

use components::chat_panel::ChatPanel;
use components::config_panel::ConfigPanel;
use error::PlaygroundError;
use session::{ReplyRequest, SchemaRequest, SessionController};
use types::AgentConfig;

#[component]
pub fn App() -> impl IntoView {
    let session = RwSignal::new(SessionController::new(Vec::new()));

    // Directory is fetched once; the first agent is selected right away
    spawn_local(async move {
        match api::list_agents().await {
            Ok(agents) => {
                log::info!("Loaded {} agents", agents.len());
                let request = session
                    .try_update(|s| {
                        *s = SessionController::new(agents);
                        s.select_first_agent()
                    })
                    .flatten();
                if let Some(request) = request {
                    load_schema(session, request);
                }
            }
            Err(e) => log::error!("Failed to load agents: {}", e),
        }
    });

    let on_agent_change = Callback::new(move |agent_id: String| {
        if let Some(request) = session.try_update(|s| s.select_agent(&agent_id)).flatten() {
            load_schema(session, request);
        }
    });

    let on_config_change = Callback::new(move |config: AgentConfig| {
        session.update(|s| s.edit_config(config));
    });

    let on_reload = Callback::new(move |_: ()| {
        session.update(|s| s.reload());
    });

    let on_save = Callback::new(move |_: ()| {
        if let Some(request) = session.try_update(|s| s.begin_save()).flatten() {
            spawn_local(async move {
                let result = api::save_agent_config(&request.agent_id, &request.config).await;
                session.update(|s| s.finish_save(request, result));
            });
        }
    });

    let on_send = Callback::new(move |text: String| {
        if let Some(request) = session.try_update(|s| s.send_message(&text)).flatten() {
            spawn_local(stream_reply(session, request));
        }
    });

    let messages = Memo::new(move |_| session.with(|s| s.messages().to_vec()));
    let is_streaming = Memo::new(move |_| session.with(|s| s.is_streaming()));
    let agent_name = Memo::new(move |_| {
        session.with(|s| s.selected_agent().map(|a| a.name.clone()).unwrap_or_default())
    });

    view! {
        <div class="flex h-screen font-sans bg-gray-900 text-gray-100">
            <ConfigPanel
                session=session.read_only()
                on_agent_change=on_agent_change
                on_config_change=on_config_change
                on_save=on_save
                on_reload=on_reload
            />
            <ChatPanel
                messages=messages
                is_streaming=is_streaming
                agent_name=agent_name
                on_send=on_send
            />
        </div>
    }
}

fn load_schema(session: RwSignal<SessionController>, request: SchemaRequest) {
    spawn_local(async move {
        let result = api::get_agent_schema(&request.agent_id).await;
        session.update(|s| {
            s.finish_schema_load(&request, result);
        });
    });
}

/// Drains one reply stream into the session, chunk by chunk
async fn stream_reply(session: RwSignal<SessionController>, request: ReplyRequest) {
    let mut stream = match api::stream_reply(&request.prompt) {
        Ok(stream) => stream,
        Err(e) => {
            session.update(|s| s.finish_stream(&request, Err(e)));
            return;
        }
    };

    while let Some(event) = stream.next_event().await {
        match event {
            Ok(event) => {
                let more = session
                    .try_update(|s| s.apply_reply_event(&request, event))
                    .unwrap_or(false);
                if !more {
                    return;
                }
            }
            Err(e) => {
                session.update(|s| s.finish_stream(&request, Err(e)));
                return;
            }
        }
    }

    let incomplete = PlaygroundError::Transport("Stream closed without completion".to_string());
    session.update(|s| s.finish_stream(&request, Err(incomplete)));
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(App);
}
