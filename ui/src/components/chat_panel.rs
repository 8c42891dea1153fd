//! Chat Panel
//!
//! Conversation with the selected agent: message list, typing indicator and
//! the input bar.

use leptos::html;
use leptos::prelude::*;
use leptos::web_sys;

use crate::types::{ChatMessage, Role};

/// Trimmed text to send, or `None` when the submission must be ignored
pub fn prepare_submission(input: &str, is_streaming: bool) -> Option<String> {
    if is_streaming {
        return None;
    }
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// The indicator follows the agent message currently being streamed
pub fn typing_indicator_visible(messages: &[ChatMessage], is_streaming: bool) -> bool {
    is_streaming
        && messages
            .last()
            .is_some_and(|message| message.role == Role::Agent)
}

pub fn send_disabled(input: &str, is_streaming: bool) -> bool {
    is_streaming || input.trim().is_empty()
}

#[component]
pub fn ChatPanel(
    #[prop(into)] messages: Signal<Vec<ChatMessage>>,
    #[prop(into)] is_streaming: Signal<bool>,
    #[prop(into)] agent_name: Signal<String>,
    /// Receives the trimmed text of each accepted submission
    on_send: Callback<String>,
) -> impl IntoView {
    let (input, set_input) = signal(String::new());
    let messages_end = NodeRef::<html::Div>::new();

    // Keep the newest message in view
    Effect::new(move || {
        messages.track();
        if let Some(end) = messages_end.get() {
            end.scroll_into_view();
        }
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if let Some(text) = prepare_submission(&input.get_untracked(), is_streaming.get_untracked()) {
            set_input.set(String::new());
            on_send.run(text);
        }
    };

    let on_input = move |ev: web_sys::Event| {
        set_input.set(event_target_value(&ev));
    };

    view! {
        <div class="w-2/3 h-full flex flex-col bg-gray-900">
            <header class="p-4 border-b border-gray-700">
                <h2 class="text-xl font-semibold text-white">
                    {move || format!("{} - Debugger", agent_name.get())}
                </h2>
            </header>

            <div class="flex-1 p-6 overflow-y-auto">
                <div class="space-y-6">
                    {move || messages.with(|m| m.is_empty()).then(|| view! {
                        <div class="text-center text-gray-500 mt-8">
                            <p>"Start a conversation with the agent."</p>
                        </div>
                    })}
                    {move || messages.get().into_iter().map(|message| view! {
                        <MessageBubble message=message />
                    }).collect_view()}
                    {move || {
                        messages
                            .with(|m| typing_indicator_visible(m, is_streaming.get()))
                            .then(|| view! { <TypingIndicator /> })
                    }}
                    <div node_ref=messages_end></div>
                </div>
            </div>

            <div class="p-4 border-t border-gray-700 bg-gray-800">
                <form class="flex items-center space-x-4" on:submit=on_submit>
                    <input
                        type="text"
                        placeholder="Type your message here..."
                        class="flex-1 bg-gray-700 border border-gray-600 rounded-lg px-4 py-2 text-white focus:outline-none focus:ring-2 focus:ring-indigo-500 disabled:opacity-50"
                        prop:value=move || input.get()
                        on:input=on_input
                        disabled=move || is_streaming.get()
                    />
                    <button
                        type="submit"
                        class="bg-indigo-600 hover:bg-indigo-700 text-white font-bold px-4 py-2 rounded-lg disabled:bg-gray-600 disabled:cursor-not-allowed"
                        disabled=move || send_disabled(&input.get(), is_streaming.get())
                    >
                        "Send"
                    </button>
                </form>
            </div>
        </div>
    }
}

#[component]
fn MessageBubble(message: ChatMessage) -> impl IntoView {
    let is_user = message.role == Role::User;
    let row_class = if is_user {
        "flex items-start gap-4 justify-end"
    } else {
        "flex items-start gap-4"
    };
    let bubble_class = if is_user {
        "max-w-xl rounded-xl px-4 py-3 text-white bg-green-600 rounded-br-none"
    } else {
        "max-w-xl rounded-xl px-4 py-3 text-white bg-gray-700 rounded-bl-none"
    };

    view! {
        <div class=row_class>
            {(!is_user).then(|| view! { <Avatar label="A" color="bg-indigo-500" /> })}
            <div class=bubble_class>
                <p class="text-sm whitespace-pre-wrap">{message.content}</p>
            </div>
            {is_user.then(|| view! { <Avatar label="U" color="bg-green-500" /> })}
        </div>
    }
}

#[component]
fn Avatar(label: &'static str, color: &'static str) -> impl IntoView {
    view! {
        <div class=format!("w-8 h-8 rounded-full flex items-center justify-center text-sm font-bold text-white {}", color)>
            {label}
        </div>
    }
}

#[component]
fn TypingIndicator() -> impl IntoView {
    view! {
        <div class="flex items-center gap-1 pl-12">
            <span class="typing-dot w-2 h-2 bg-gray-400 rounded-full"></span>
            <span class="typing-dot w-2 h-2 bg-gray-400 rounded-full"></span>
            <span class="typing-dot w-2 h-2 bg-gray-400 rounded-full"></span>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: u64, role: Role, content: &str) -> ChatMessage {
        ChatMessage {
            id,
            role,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_submission_is_trimmed() {
        assert_eq!(prepare_submission("  Hello \n", false), Some("Hello".to_string()));
    }

    #[test]
    fn test_blank_submission_ignored() {
        assert_eq!(prepare_submission("", false), None);
        assert_eq!(prepare_submission("   \t", false), None);
    }

    #[test]
    fn test_submission_ignored_while_streaming() {
        assert_eq!(prepare_submission("Hello", true), None);
    }

    #[test]
    fn test_send_button_state() {
        assert!(send_disabled("", false));
        assert!(send_disabled("  ", false));
        assert!(send_disabled("Hello", true));
        assert!(!send_disabled("Hello", false));
    }

    #[test]
    fn test_typing_indicator_follows_agent_message() {
        let streaming = vec![message(1, Role::User, "Hi"), message(2, Role::Agent, "")];
        assert!(typing_indicator_visible(&streaming, true));
        assert!(!typing_indicator_visible(&streaming, false));

        let user_last = vec![message(1, Role::User, "Hi")];
        assert!(!typing_indicator_visible(&user_last, true));
        assert!(!typing_indicator_visible(&[], true));
    }
}
