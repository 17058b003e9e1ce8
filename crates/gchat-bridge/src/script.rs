//! Scripts exchanged with the hosted page

use serde_json::Value;

/// Script injected into the chat page once it has loaded
pub const PAGE_BRIDGE: &str = include_str!("js/page_bridge.js");

pub const NOTIFICATION_CLICK_EVENT: &str = "notificationClick";
pub const NOTIFICATION_CLOSE_EVENT: &str = "notificationClose";

/// Build the script that fires `event` on the page window for `tag`.
///
/// The tag is emitted as a JSON string literal so any quote or backslash in
/// it stays inside the literal.
pub fn dispatch_notification_event(event: &str, tag: &str) -> String {
    let tag = Value::String(tag.to_string());
    format!(
        "window.dispatchEvent(new CustomEvent('{}', {{ detail: {{ tag: {} }} }}));",
        event, tag
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::BridgeMessage;
    use boa_engine::{Context, Source};
    use gchat_core::TrayIconState;

    /// Minimal browser surface the page bridge touches
    const DOM_STUB: &str = r#"
        globalThis.EventTarget = class {
            constructor() { this.__listeners = {}; }
            addEventListener(type, fn) {
                (this.__listeners[type] = this.__listeners[type] || []).push(fn);
            }
            dispatchEvent(event) {
                (this.__listeners[event.type] || []).slice().forEach((fn) => fn.call(this, event));
                return true;
            }
        };
        globalThis.Event = class { constructor(type) { this.type = type; } };
        globalThis.CustomEvent = class extends Event {
            constructor(type, init) { super(type); this.detail = init ? init.detail : undefined; }
        };
        globalThis.console = { log() {}, error() {} };
        globalThis.__posted = [];
        globalThis.__intervals = [];
        globalThis.__favicon = null;
        globalThis.document = {
            querySelector: (selector) => (__favicon === null ? null : { href: __favicon })
        };
        globalThis.setInterval = (fn, ms) => { __intervals.push({ fn, ms }); return __intervals.length; };
        globalThis.fetch = (url) => Promise.reject(new Error('offline: ' + url));
        globalThis.window = new EventTarget();
        window.ipc = { postMessage: (payload) => __posted.push(payload) };
        window.Notification = function () {};
        window.Notification.permission = 'granted';
        window.Notification.requestPermission = function () { return Promise.resolve('granted'); };
    "#;

    fn page(favicon: Option<&str>) -> Context {
        let mut ctx = Context::default();
        run(&mut ctx, DOM_STUB);
        if let Some(href) = favicon {
            run(&mut ctx, &format!("__favicon = {};", Value::String(href.to_string())));
        }
        run(&mut ctx, PAGE_BRIDGE);
        ctx
    }

    fn run(ctx: &mut Context, code: &str) -> String {
        let value = ctx
            .eval(Source::from_bytes(code))
            .expect("script evaluation failed");
        value
            .to_string(ctx)
            .expect("result is not printable")
            .to_std_string_escaped()
    }

    fn posted(ctx: &mut Context) -> Vec<String> {
        serde_json::from_str(&run(ctx, "JSON.stringify(__posted)")).unwrap()
    }

    #[test]
    fn test_dispatch_script_escapes_tag() {
        let script = dispatch_notification_event(NOTIFICATION_CLICK_EVENT, r#"a'b"c"#);
        assert_eq!(
            script,
            r#"window.dispatchEvent(new CustomEvent('notificationClick', { detail: { tag: "a'b\"c" } }));"#
        );
    }

    #[test]
    fn test_click_is_delivered_once_per_tag() {
        let mut ctx = page(None);
        run(
            &mut ctx,
            r#"
                var clicks = 0;
                var handlerClicks = 0;
                var n = new window.Notification('Alice', { body: 'Hi', tag: 't1' });
                n.addEventListener('click', () => clicks++);
                n.onclick = () => handlerClicks++;
            "#,
        );

        let click = dispatch_notification_event(NOTIFICATION_CLICK_EVENT, "t1");
        run(&mut ctx, &click);
        run(&mut ctx, &click);

        assert_eq!(run(&mut ctx, "clicks"), "1");
        assert_eq!(run(&mut ctx, "handlerClicks"), "1");
    }

    #[test]
    fn test_close_is_redelivered_and_forgets_tag() {
        let mut ctx = page(None);
        run(
            &mut ctx,
            r#"
                var events = [];
                var n = new window.Notification('Bob', { body: 'Yo', tag: 't2' });
                n.addEventListener('click', () => events.push('click'));
                n.addEventListener('close', () => events.push('close'));
            "#,
        );

        run(&mut ctx, &dispatch_notification_event(NOTIFICATION_CLOSE_EVENT, "t2"));
        run(&mut ctx, &dispatch_notification_event(NOTIFICATION_CLICK_EVENT, "t2"));

        assert_eq!(run(&mut ctx, "events.join(',')"), "close");
    }

    #[test]
    fn test_notification_posts_decodable_message() {
        let mut ctx = page(None);
        run(&mut ctx, "new window.Notification('Alice', { body: 'Hi', tag: 't1' });");

        let messages = posted(&mut ctx);
        assert_eq!(messages.len(), 1);
        match BridgeMessage::decode(&messages[0]).unwrap() {
            BridgeMessage::Notification(n) => {
                assert_eq!(n.title, "Alice");
                assert_eq!(n.body, "Hi");
                assert_eq!(n.tag.as_deref(), Some("t1"));
                assert_eq!(n.icon_base64, None);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_icon_fetch_failure_still_posts() {
        let mut ctx = page(None);
        run(
            &mut ctx,
            "new window.Notification('Carol', { body: 'Pic', icon: 'https://lh3.googleusercontent.com/a.png' });",
        );
        let _ = ctx.run_jobs();

        let messages = posted(&mut ctx);
        assert_eq!(messages.len(), 1);
        match BridgeMessage::decode(&messages[0]).unwrap() {
            BridgeMessage::Notification(n) => {
                assert_eq!(n.title, "Carol");
                assert_eq!(n.icon_base64, None);
                assert_eq!(n.icon_mime_type, None);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_permission_is_forwarded() {
        let mut ctx = page(None);
        assert_eq!(run(&mut ctx, "window.Notification.permission"), "granted");
        assert_eq!(run(&mut ctx, "typeof window.Notification.requestPermission"), "function");
    }

    #[test]
    fn test_initial_favicon_state_is_posted() {
        let mut ctx = page(Some(
            "https://ssl.gstatic.com/chat/favicon/favicon_chat_new_notif_r2.ico",
        ));

        let messages = posted(&mut ctx);
        assert_eq!(messages.len(), 1);
        assert_eq!(
            BridgeMessage::decode(&messages[0]).unwrap(),
            BridgeMessage::Favicon { state: TrayIconState::Badge }
        );
    }

    #[test]
    fn test_no_favicon_posts_nothing() {
        let mut ctx = page(None);
        assert!(posted(&mut ctx).is_empty());
    }

    #[test]
    fn test_favicon_poll_reports_changes_only() {
        let mut ctx = page(Some("https://ssl.gstatic.com/chat/favicon/favicon_chat_r2.ico"));
        assert_eq!(run(&mut ctx, "__intervals.length"), "1");
        assert_eq!(run(&mut ctx, "__intervals[0].ms"), "1000");

        // Unchanged favicon
        run(&mut ctx, "__intervals[0].fn()");
        assert_eq!(posted(&mut ctx).len(), 1);

        run(&mut ctx, "__favicon = 'https://example.com/static/offline.ico'; __intervals[0].fn();");
        let messages = posted(&mut ctx);
        assert_eq!(messages.len(), 2);
        assert_eq!(
            BridgeMessage::decode(&messages[0]).unwrap(),
            BridgeMessage::Favicon { state: TrayIconState::Normal }
        );
        assert_eq!(
            BridgeMessage::decode(&messages[1]).unwrap(),
            BridgeMessage::Favicon { state: TrayIconState::Offline }
        );
    }

    #[test]
    fn test_second_injection_is_ignored() {
        let mut ctx = page(Some("https://ssl.gstatic.com/chat/favicon/favicon_chat_r2.ico"));
        run(&mut ctx, PAGE_BRIDGE);

        assert_eq!(run(&mut ctx, "__intervals.length"), "1");
        assert_eq!(posted(&mut ctx).len(), 1);
    }
}
