use leptos::*;
use leptos_meta::*;
use push_host::{magnet_links, CapabilityStatus};
use push_host_web::PageContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PushStatus {
    Pending,
    AwaitingPermission,
    Enabled,
    Unavailable,
}

impl PushStatus {
    fn starting(notifications: CapabilityStatus) -> Self {
        if notifications.is_available() || !notifications.is_supported() {
            Self::Pending
        } else {
            Self::AwaitingPermission
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Pending => "Setting up push notifications...",
            Self::AwaitingPermission => "Allow notifications to hear when your downloads finish.",
            Self::Enabled => "You will be notified when your downloads finish.",
            Self::Unavailable => "Push notifications are unavailable; submissions still work.",
        }
    }
}

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Torrent Submission" />
        <Meta name="description" content="Submit magnet links and torrent files for download." />

        <main class="site-root">
            <SubmissionPage />
        </main>
    }
}

#[component]
pub fn SubmissionPage() -> impl IntoView {
    let page = PageContext::load();
    let capabilities = page.capabilities();
    let (push_status, set_push_status) =
        create_signal(PushStatus::starting(capabilities.notifications));
    let (magnet_count, set_magnet_count) = create_signal(0usize);
    let (handler_registered, set_handler_registered) =
        create_signal(page.magnet_handler_remembered());
    let handlers_supported = capabilities.protocol_handlers.is_supported();
    let (notice, set_notice) = create_signal(None::<String>);

    let boot_page = page.clone();
    create_effect(move |_| {
        let page = boot_page.clone();
        spawn_local(async move {
            let subscribed = page
                .boot()
                .await
                .is_some_and(|report| !report.subscription_value.is_empty());
            set_push_status.set(if subscribed {
                PushStatus::Enabled
            } else {
                PushStatus::Unavailable
            });
        });
    });

    let handler_page = page.clone();
    let register_handler = move |_| {
        let page = handler_page.clone();
        spawn_local(async move {
            match page.register_magnet_handler().await {
                Ok(()) => set_handler_registered.set(true),
                Err(err) => set_notice.set(Some(format!("Could not register handler: {err}"))),
            }
        });
    };

    let unsubscribe = move |_| {
        let page = page.clone();
        spawn_local(async move {
            match page.unsubscribe().await {
                Ok(_) => {
                    set_push_status.set(PushStatus::Unavailable);
                    set_notice.set(Some("Push notifications turned off.".to_string()));
                }
                Err(err) => set_notice.set(Some(format!("Could not unsubscribe: {err}"))),
            }
        });
    };

    view! {
        <section class="submission">
            <h1>"Add torrents"</h1>
            <form method="post" action="/" enctype="multipart/form-data">
                <label for="magnets">"Magnet links, one per line"</label>
                <textarea
                    id="magnets"
                    name="magnets"
                    rows="6"
                    on:input=move |ev| set_magnet_count.set(magnet_links(&event_target_value(&ev)).len())
                ></textarea>
                <p class="magnet-count">
                    {move || match magnet_count.get() {
                        1 => "1 magnet link".to_string(),
                        count => format!("{count} magnet links"),
                    }}
                </p>
                <label for="torrents">"Torrent files"</label>
                <input id="torrents" type="file" name="torrents" accept=".torrent" multiple />
                <input id="subscription" type="hidden" name="subscription" value="" />
                <button id="add" type="submit" disabled=true>"Add"</button>
            </form>
            <p class="push-status">{move || push_status.get().label()}</p>
            <div class="push-actions">
                <button
                    type="button"
                    on:click=register_handler
                    disabled=move || handler_registered.get() || !handlers_supported
                >
                    {move || {
                        if handler_registered.get() {
                            "Magnet links open here"
                        } else {
                            "Open magnet links with this page"
                        }
                    }}
                </button>
                <button
                    type="button"
                    on:click=unsubscribe
                    disabled=move || push_status.get() != PushStatus::Enabled
                >
                    "Turn off notifications"
                </button>
            </div>
            <Show when=move || notice.get().is_some()>
                <p class="notice">{move || notice.get().unwrap_or_default()}</p>
            </Show>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_are_distinct() {
        assert_ne!(PushStatus::Enabled.label(), PushStatus::Unavailable.label());
        assert_ne!(PushStatus::Pending.label(), PushStatus::Enabled.label());
    }

    #[test]
    fn permission_prompt_is_announced_up_front() {
        assert_eq!(
            PushStatus::starting(CapabilityStatus::RequiresUserActivation),
            PushStatus::AwaitingPermission
        );
        assert_eq!(
            PushStatus::starting(CapabilityStatus::Available),
            PushStatus::Pending
        );
    }
}
