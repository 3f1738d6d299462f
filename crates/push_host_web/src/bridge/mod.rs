//! Browser capability bridge for `push_host_web` adapters.
//!
//! Service-worker, push, DOM, and page-global access all route through `interop`, which swaps in a
//! non-wasm shim on native targets.

mod interop;

pub use interop::*;

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use push_host::PushCapabilities;

    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn service_worker_api_non_wasm_parity() {
        let expected = "Browser push APIs are only available when compiled for wasm32".to_string();

        assert_eq!(
            block_on(register_service_worker("/worker.js", "/")).expect_err("register should fail"),
            expected
        );
        assert_eq!(
            block_on(service_worker_ready()).expect_err("ready should fail"),
            expected
        );
        assert_eq!(
            block_on(show_notification("title", None, None)).expect_err("show should fail"),
            expected
        );
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn page_api_non_wasm_parity() {
        assert_eq!(cookie_string().expect("cookies"), "");
        assert_eq!(assign_cookie("a=b"), Ok(()));
        assert!(set_input_value("subscription", "").is_err());
        assert!(set_button_disabled("add", false).is_err());
        assert!(
            block_on(register_protocol_handler("magnet", "/?magnet=%s", "t")).is_err()
        );
        assert_eq!(global_string("vapidPublicKey"), None);
        assert_eq!(global_push_config("pushConfig"), Ok(None));
        assert_eq!(location_search(), "");
        assert_eq!(location_origin(), None);
        assert_eq!(capabilities(), PushCapabilities::unsupported());
    }
}
