use std::sync::Arc;

use gpui::{AppContext, Bounds, WindowBounds, WindowOptions, px, size};
use tracing::{error, info};

use crate::assets::Assets;
use crate::contact::{ContactController, ContactOptions};
use crate::i18n::{I18nManager, Locale};
use crate::page::ContactPage;
use crate::sender::MessageSender;
use crate::site::SiteProfile;

type LaunchHook = Box<dyn FnOnce(&mut gpui::App) + 'static>;

/// Boots gpui with the embedded assets and opens the contact page window.
pub struct ContactApplication {
    application: gpui::Application,
    profile: SiteProfile,
    i18n: I18nManager,
    options: ContactOptions,
    sender: Option<Arc<dyn MessageSender>>,
    launch_hooks: Vec<LaunchHook>,
}

impl ContactApplication {
    pub fn new(profile: SiteProfile) -> Self {
        Self {
            application: gpui::Application::new().with_assets(Assets),
            profile,
            i18n: I18nManager::new(),
            options: ContactOptions::default(),
            sender: None,
            launch_hooks: Vec::new(),
        }
    }

    pub fn with_locale(self, locale: impl Into<Locale>) -> Self {
        self.i18n.set_locale(locale);
        self
    }

    pub fn with_options(mut self, options: ContactOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the simulated delivery.
    pub fn with_sender(mut self, sender: impl MessageSender) -> Self {
        self.sender = Some(Arc::new(sender));
        self
    }

    pub fn before_launch(mut self, hook: impl FnOnce(&mut gpui::App) + 'static) -> Self {
        self.launch_hooks.push(Box::new(hook));
        self
    }

    pub fn run(self) {
        let Self {
            application,
            profile,
            i18n,
            options,
            sender,
            launch_hooks,
        } = self;
        let controller = match sender {
            Some(sender) => ContactController::with_shared_sender(options, sender),
            None => ContactController::simulated(options),
        };

        application.run(move |cx| {
            for hook in launch_hooks {
                hook(cx);
            }

            info!(
                locale = i18n.resolved_locale(),
                owner = %profile.name,
                "opening contact page"
            );
            let bounds = Bounds::centered(None, size(px(1200.), px(860.)), cx);
            let opened = cx.open_window(
                WindowOptions {
                    window_bounds: Some(WindowBounds::Windowed(bounds)),
                    ..Default::default()
                },
                |_, cx| cx.new(|cx| ContactPage::new(profile, i18n, controller, cx)),
            );
            match opened {
                Ok(_) => cx.activate(true),
                Err(window_error) => {
                    error!(error = %window_error, "failed to open contact window");
                    cx.quit();
                }
            }
        });
    }
}
