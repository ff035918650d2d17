use std::collections::BTreeMap;
use std::time::Duration;

use gpui::{
    Animation, AnimationExt, ClickEvent, Context, FocusHandle, FontWeight, InteractiveElement,
    IntoElement, KeyDownEvent, ParentElement, Render, SharedString, StatefulInteractiveElement,
    Styled, Task, Transformation, Window, div, percentage, px, rgb, svg, white,
};
use tracing::error;

use crate::contact::{
    ContactController, ContactError, ContactForm, ContactFormFields, ContactSnapshot, DismissTimer,
};
use crate::form::{
    DismissTicket, FieldKey, FieldLens, FormModel, SubmitOutcome, SubmitStart, ValidationError,
};
use crate::i18n::I18nManager;
use crate::rich_text;
use crate::site::SiteProfile;
use crate::text_edit::{EditOutcome, KeyInput, TextEditState};

const GRAY_50: u32 = 0xf9fafb;
const GRAY_100: u32 = 0xf3f4f6;
const GRAY_300: u32 = 0xd1d5db;
const GRAY_400: u32 = 0x9ca3af;
const GRAY_600: u32 = 0x4b5563;
const GRAY_700: u32 = 0x374151;
const GRAY_800: u32 = 0x1f2937;
const GRAY_900: u32 = 0x111827;
const BLUE_50: u32 = 0xeff6ff;
const BLUE_100: u32 = 0xdbeafe;
const BLUE_400: u32 = 0x60a5fa;
const BLUE_500: u32 = 0x3b82f6;
const BLUE_600: u32 = 0x2563eb;
const BLUE_700: u32 = 0x1d4ed8;
const GREEN_100: u32 = 0xdcfce7;
const GREEN_200: u32 = 0xbbf7d0;
const GREEN_700: u32 = 0x15803d;
const GREEN_800: u32 = 0x166534;
const RED_100: u32 = 0xfee2e2;
const RED_200: u32 = 0xfecaca;
const RED_400: u32 = 0xf87171;
const RED_700: u32 = 0xb91c1c;

const CARET_BLINK_CYCLE: Duration = Duration::from_millis(1000);

struct PendingDismiss {
    _timer: DismissTimer,
    _task: Task<()>,
}

/// The contact page: owner details on the left, the message form on the right.
pub struct ContactPage {
    controller: ContactController,
    profile: SiteProfile,
    i18n: I18nManager,
    editors: BTreeMap<FieldKey, TextEditState>,
    focus_handles: BTreeMap<FieldKey, FocusHandle>,
    highlighted: Vec<FieldKey>,
    delivery: Option<Task<()>>,
    dismiss: Option<PendingDismiss>,
}

impl ContactPage {
    pub fn new(
        profile: SiteProfile,
        i18n: I18nManager,
        controller: ContactController,
        cx: &mut Context<Self>,
    ) -> Self {
        let keys = ContactForm::field_keys();
        Self {
            controller,
            profile,
            i18n,
            editors: keys
                .iter()
                .map(|key| (*key, TextEditState::default()))
                .collect(),
            focus_handles: keys.iter().map(|key| (*key, cx.focus_handle())).collect(),
            highlighted: Vec::new(),
            delivery: None,
            dismiss: None,
        }
    }

    pub fn controller(&self) -> &ContactController {
        &self.controller
    }

    fn submit(&mut self, cx: &mut Context<Self>) {
        if self.delivery.is_some() {
            return;
        }
        self.dismiss = None;

        match self.controller.begin_submit() {
            Ok(SubmitStart::Rejected(rejection)) => {
                self.highlighted = match rejection {
                    ContactError::MissingFields => self
                        .controller
                        .snapshot()
                        .map(|snapshot| snapshot.form.missing_fields())
                        .unwrap_or_default(),
                    ContactError::InvalidEmail => vec![ContactForm::fields().email().key()],
                    ContactError::SendFailed { .. } => Vec::new(),
                };
            }
            Ok(SubmitStart::Ready(form)) => {
                self.highlighted.clear();
                let delivery = self.controller.deliver(form);
                self.delivery = Some(cx.spawn(async move |this, cx| {
                    let result = delivery.await;
                    let _ = this.update(cx, |page, cx| page.finish_delivery(result, cx));
                }));
            }
            Err(form_error) => error!(error = %form_error, "contact form submit failed"),
        }

        cx.notify();
    }

    fn finish_delivery(&mut self, result: Result<(), ContactError>, cx: &mut Context<Self>) {
        self.delivery.take();
        match self.controller.complete_submit(result) {
            Ok(SubmitOutcome::Sent(ticket)) => self.arm_dismiss(ticket, cx),
            Ok(SubmitOutcome::Rejected(_) | SubmitOutcome::Failed(_)) => {}
            Err(form_error) => error!(error = %form_error, "contact form completion failed"),
        }
        cx.notify();
    }

    fn arm_dismiss(&mut self, ticket: DismissTicket, cx: &mut Context<Self>) {
        let (timer, wait) = self.controller.schedule_dismiss(ticket);
        let task = cx.spawn(async move |this, cx| match wait.await {
            Ok(true) => {
                let _ = this.update(cx, |_, cx| cx.notify());
            }
            Ok(false) => {}
            Err(form_error) => error!(error = %form_error, "success banner dismissal failed"),
        });
        self.dismiss = Some(PendingDismiss {
            _timer: timer,
            _task: task,
        });
    }

    fn focus_field(&mut self, key: FieldKey, window: &mut Window, cx: &mut Context<Self>) {
        if let Some(handle) = self.focus_handles.get(&key) {
            window.focus(handle);
        }
        if let Some(editor) = self.editors.get_mut(&key) {
            let end = editor.len();
            editor.move_to(end);
        }
        cx.notify();
    }

    fn move_focus(
        &mut self,
        from: FieldKey,
        step: isize,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let keys = ContactForm::field_keys();
        let Some(index) = keys.iter().position(|key| *key == from) else {
            return;
        };
        let next = (index as isize + step).rem_euclid(keys.len() as isize) as usize;
        self.focus_field(keys[next], window, cx);
    }

    fn handle_key(
        &mut self,
        key: FieldKey,
        event: &KeyDownEvent,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let keystroke = &event.keystroke;
        let input = KeyInput {
            key: keystroke.key.as_str(),
            key_char: keystroke.key_char.as_deref(),
            shift: keystroke.modifiers.shift,
            command: keystroke.modifiers.control || keystroke.modifiers.platform,
        };
        let current = match self.controller.snapshot() {
            Ok(snapshot) => snapshot.form.value_by_key(key).unwrap_or_default().to_string(),
            Err(form_error) => {
                error!(error = %form_error, "contact form state unavailable");
                return;
            }
        };
        let Some(editor) = self.editors.get_mut(&key) else {
            return;
        };
        editor.sync(&current);

        match editor.apply_key(input, field_copy(key).multiline) {
            EditOutcome::Changed => {
                let value = editor.value().to_string();
                if let Err(form_error) = self.controller.set_by_key(key, value) {
                    error!(error = %form_error, field = %key, "failed to update contact field");
                }
                self.highlighted.retain(|highlighted| *highlighted != key);
                cx.notify();
            }
            EditOutcome::Moved => cx.notify(),
            EditOutcome::Submit => self.submit(cx),
            EditOutcome::FocusNext => self.move_focus(key, 1, window, cx),
            EditOutcome::FocusPrevious => self.move_focus(key, -1, window, cx),
            EditOutcome::Ignored => return,
        }
        cx.stop_propagation();
    }

    fn render_header(&self) -> impl IntoElement {
        div()
            .flex()
            .flex_col()
            .items_center()
            .gap_4()
            .mb_16()
            .max_w(px(896.))
            .mx_auto()
            .child(
                div()
                    .flex()
                    .flex_row()
                    .items_center()
                    .gap_3()
                    .child(
                        div()
                            .text_size(px(52.))
                            .font_weight(FontWeight::EXTRA_BOLD)
                            .text_color(rgb(GRAY_900))
                            .child(self.i18n.t("contact.title")),
                    )
                    .child(
                        svg()
                            .path("icons/handshake.svg")
                            .size(px(44.))
                            .text_color(rgb(BLUE_600)),
                    ),
            )
            .child(
                div()
                    .text_xl()
                    .text_color(rgb(GRAY_600))
                    .child(self.i18n.t("contact.intro")),
            )
    }

    fn render_details(&self) -> impl IntoElement {
        let mailto = self.profile.mailto();
        let github = self.profile.github.clone();
        let linkedin = self.profile.linkedin.clone();

        div()
            .w(px(380.))
            .flex_none()
            .flex()
            .flex_col()
            .justify_between()
            .gap_8()
            .p_8()
            .bg(white())
            .rounded_2xl()
            .shadow_2xl()
            .border_1()
            .border_color(rgb(GRAY_100))
            .child(
                div()
                    .flex()
                    .flex_col()
                    .child(
                        div()
                            .text_3xl()
                            .font_weight(FontWeight::BOLD)
                            .text_color(rgb(GRAY_800))
                            .mb_6()
                            .pb_2()
                            .border_b_1()
                            .border_color(rgb(BLUE_100))
                            .child(self.i18n.t("contact.details.heading")),
                    )
                    .child(
                        div()
                            .flex()
                            .flex_col()
                            .gap_6()
                            .child(detail_row(
                                "icons/map-pin.svg",
                                self.i18n.t("contact.details.location"),
                                self.profile.location.clone().into(),
                            ))
                            .child(
                                div()
                                    .id("contact-email")
                                    .cursor_pointer()
                                    .on_click(move |_, _, cx| cx.open_url(&mailto))
                                    .child(detail_row(
                                        "icons/mail.svg",
                                        self.i18n.t("contact.details.email"),
                                        self.profile.email.clone().into(),
                                    )),
                            ),
                    ),
            )
            .child(
                div()
                    .flex()
                    .flex_col()
                    .pt_6()
                    .border_t_1()
                    .border_color(rgb(GRAY_100))
                    .child(
                        div()
                            .text_xl()
                            .font_weight(FontWeight::BOLD)
                            .text_color(rgb(GRAY_800))
                            .mb_4()
                            .child(self.i18n.t("contact.details.follow")),
                    )
                    .child(
                        div()
                            .flex()
                            .flex_row()
                            .gap_4()
                            .child(social_link(
                                "contact-github",
                                "icons/github.svg",
                                github,
                                (GRAY_100, GRAY_300),
                                GRAY_800,
                            ))
                            .child(social_link(
                                "contact-linkedin",
                                "icons/linkedin.svg",
                                linkedin,
                                (BLUE_50, BLUE_100),
                                BLUE_700,
                            )),
                    ),
            )
    }

    fn render_form(
        &self,
        snapshot: &ContactSnapshot,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> impl IntoElement {
        let [name, email, message] = ContactFormFields::KEYS;

        let mut panel = div()
            .flex_1()
            .flex()
            .flex_col()
            .p_12()
            .bg(rgb(GRAY_50))
            .rounded_2xl()
            .shadow_2xl()
            .border_1()
            .border_color(rgb(GRAY_100))
            .child(
                div()
                    .text_3xl()
                    .font_weight(FontWeight::BOLD)
                    .text_color(rgb(GRAY_800))
                    .mb_8()
                    .child(self.i18n.t("contact.form.heading")),
            );

        if snapshot.submitted {
            let spans = rich_text::render_template(
                &self.i18n.t("contact.form.success"),
                &[("name", &self.profile.name)],
            );
            panel = panel.child(
                banner(GREEN_100, GREEN_200, GREEN_700).child(rich_text::styled_text(
                    &spans,
                    rgb(GREEN_700).into(),
                    rgb(GREEN_800).into(),
                )),
            );
        }
        if let Some(contact_error) = &snapshot.error {
            panel = panel.child(
                banner(RED_100, RED_200, RED_700).child(contact_error.message(&self.i18n)),
            );
        }

        panel
            .child(
                div()
                    .flex()
                    .flex_row()
                    .gap_6()
                    .child(self.render_field(name, snapshot, window, cx))
                    .child(self.render_field(email, snapshot, window, cx)),
            )
            .child(
                div()
                    .mt_6()
                    .flex()
                    .child(self.render_field(message, snapshot, window, cx)),
            )
            .child(div().mt_8().child(self.render_submit(snapshot.loading, cx)))
    }

    fn render_field(
        &self,
        key: FieldKey,
        snapshot: &ContactSnapshot,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> impl IntoElement {
        let copy = field_copy(key);
        let value = snapshot.form.value_by_key(key).unwrap_or_default();
        let focus_handle = self.focus_handles.get(&key);
        let focused = focus_handle.is_some_and(|handle| handle.is_focused(window));
        let border = if self.highlighted.contains(&key) {
            RED_400
        } else if focused {
            BLUE_500
        } else {
            GRAY_300
        };

        let mut input = div()
            .id(SharedString::from(format!("contact-field-{key}")))
            .w_full()
            .p_3()
            .bg(white())
            .border_1()
            .border_color(rgb(border))
            .rounded_xl()
            .shadow_sm()
            .text_base()
            .cursor_text()
            .on_key_down(cx.listener(move |page, event: &KeyDownEvent, window, cx| {
                page.handle_key(key, event, window, cx)
            }))
            .on_click(cx.listener(move |page, _: &ClickEvent, window, cx| {
                page.focus_field(key, window, cx)
            }));
        if let Some(handle) = focus_handle {
            input = input.track_focus(handle);
        }
        if copy.multiline {
            input = input.min_h(px(160.));
        }

        let content = if focused {
            let (before, after) = self
                .editors
                .get(&key)
                .map(TextEditState::split_at_caret)
                .unwrap_or((value, ""));
            div()
                .flex()
                .flex_row()
                .flex_wrap()
                .text_color(rgb(GRAY_800))
                .child(before.to_string())
                .child(
                    div()
                        .w(px(1.5))
                        .h(px(20.))
                        .bg(rgb(GRAY_800))
                        .with_animation(
                            SharedString::from(format!("contact-caret-{key}")),
                            Animation::new(CARET_BLINK_CYCLE)
                                .repeat()
                                .with_easing(gpui::linear),
                            |this, delta| {
                                let visible = (delta * 2.0).fract() < 0.5;
                                this.opacity(if visible { 1.0 } else { 0.0 })
                            },
                        ),
                )
                .child(after.to_string())
        } else if value.is_empty() {
            div()
                .text_color(rgb(GRAY_400))
                .child(self.i18n.t(copy.placeholder))
        } else {
            div().text_color(rgb(GRAY_800)).child(value.to_string())
        };

        div()
            .flex_1()
            .flex()
            .flex_col()
            .gap_2()
            .child(
                div()
                    .text_sm()
                    .font_weight(FontWeight::MEDIUM)
                    .text_color(rgb(GRAY_700))
                    .child(self.i18n.t(copy.label)),
            )
            .child(input.child(content))
    }

    fn render_submit(&self, loading: bool, cx: &mut Context<Self>) -> impl IntoElement {
        let button = div()
            .id("contact-submit")
            .w_full()
            .py_4()
            .flex()
            .flex_row()
            .items_center()
            .justify_center()
            .gap_3()
            .rounded_xl()
            .text_lg()
            .font_weight(FontWeight::SEMIBOLD)
            .text_color(white());

        if loading {
            button
                .bg(rgb(BLUE_400))
                .cursor_not_allowed()
                .child(
                    svg()
                        .path("icons/loader.svg")
                        .size(px(20.))
                        .text_color(white())
                        .with_animation(
                            "contact-submit-spinner",
                            Animation::new(Duration::from_secs(1)).repeat(),
                            |icon, delta| {
                                icon.with_transformation(Transformation::rotate(percentage(delta)))
                            },
                        ),
                )
                .child(self.i18n.t("contact.form.sending"))
        } else {
            button
                .bg(rgb(BLUE_600))
                .shadow_xl()
                .cursor_pointer()
                .hover(|style| style.bg(rgb(BLUE_700)))
                .on_click(cx.listener(|page, _: &ClickEvent, _, cx| page.submit(cx)))
                .child(self.i18n.t("contact.form.submit"))
        }
    }
}

impl Render for ContactPage {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let root = div()
            .id("contact-page")
            .size_full()
            .overflow_y_scroll()
            .px_4()
            .py_16()
            .bg(rgb(GRAY_50));

        let snapshot = match self.controller.snapshot() {
            Ok(snapshot) => snapshot,
            Err(form_error) => {
                error!(error = %form_error, "contact form state unavailable");
                return root.child(form_error.to_string());
            }
        };
        for (key, editor) in &mut self.editors {
            editor.sync(snapshot.form.value_by_key(*key).unwrap_or_default());
        }

        root.child(self.render_header()).child(
            div()
                .w_full()
                .max_w(px(1152.))
                .mx_auto()
                .flex()
                .flex_row()
                .gap_10()
                .child(self.render_details())
                .child(self.render_form(&snapshot, window, cx)),
        )
    }
}

impl Drop for ContactPage {
    fn drop(&mut self) {
        if let Err(form_error) = self.controller.teardown() {
            error!(error = %form_error, "contact page teardown failed");
        }
    }
}

struct FieldCopy {
    label: &'static str,
    placeholder: &'static str,
    multiline: bool,
}

fn field_copy(key: FieldKey) -> FieldCopy {
    match key.as_str() {
        "email" => FieldCopy {
            label: "contact.form.email_label",
            placeholder: "contact.form.email_placeholder",
            multiline: false,
        },
        "message" => FieldCopy {
            label: "contact.form.message_label",
            placeholder: "contact.form.message_placeholder",
            multiline: true,
        },
        _ => FieldCopy {
            label: "contact.form.name_label",
            placeholder: "contact.form.name_placeholder",
            multiline: false,
        },
    }
}

fn banner(background: u32, border: u32, text: u32) -> gpui::Div {
    div()
        .flex()
        .justify_center()
        .mb_6()
        .p_4()
        .rounded_xl()
        .border_1()
        .border_color(rgb(border))
        .bg(rgb(background))
        .text_color(rgb(text))
        .font_weight(FontWeight::MEDIUM)
}

fn detail_row(icon: &'static str, title: SharedString, value: SharedString) -> impl IntoElement {
    div()
        .flex()
        .flex_row()
        .items_start()
        .gap_4()
        .child(
            svg()
                .path(icon)
                .size(px(22.))
                .mt_1()
                .flex_none()
                .text_color(rgb(BLUE_600)),
        )
        .child(
            div()
                .flex()
                .flex_col()
                .overflow_hidden()
                .child(
                    div()
                        .font_weight(FontWeight::SEMIBOLD)
                        .text_color(rgb(GRAY_800))
                        .child(title),
                )
                .child(div().truncate().text_color(rgb(GRAY_700)).child(value)),
        )
}

fn social_link(
    id: &'static str,
    icon: &'static str,
    url: String,
    (background, hover_background): (u32, u32),
    foreground: u32,
) -> impl IntoElement {
    div()
        .id(id)
        .p_3()
        .rounded_full()
        .bg(rgb(background))
        .cursor_pointer()
        .hover(move |style| style.bg(rgb(hover_background)))
        .on_click(move |_, _, cx| cx.open_url(&url))
        .child(
            svg()
                .path(icon)
                .size(px(24.))
                .text_color(rgb(foreground)),
        )
}
