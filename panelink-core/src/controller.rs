//! Panel controller
//!
//! Owns the page set, entity store, navigation state and outbound command
//! scheduler, and drives them from three inputs:
//! - panel payloads ([`Controller::handle_payload`])
//! - backend entity updates ([`Controller::on_update`])
//! - the periodic tick ([`Controller::tick`]), which fires debounce timers,
//!   performs pending redraws and releases at most one frame
//!
//! Everything runs on one logical thread; callers serialise access.

use alloc::vec::Vec;

use panelink_protocol::{ButtonType, CommandWriter, PanelEvent};

use crate::clock::WallClock;
use crate::config::{DisplayConfig, PanelConfig};
use crate::debounce::DebounceTable;
use crate::detail::render_detail;
use crate::dispatch::{self, item_uuid, Action, PressOutcome, PressTracker};
use crate::entity::{attr, color_mode_attributes, EntityHandle, EntityKind, EntityStore};
use crate::nav::{NavState, NavTarget, PageBounds};
use crate::page::PageSet;
use crate::scheduler::CommandScheduler;
use crate::traits::{Backend, PageRenderer};

/// Identity of a pending debounce timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerKey {
    /// Replay of the latest repeated press
    ButtonPress,
    /// Settling of a burst of updates for one entity
    Entity(EntityHandle),
}

/// Counts reported after loading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stats {
    pub pages: usize,
    pub stateful_items: usize,
    pub entities: usize,
}

/// The panel state machine
pub struct Controller<B: Backend, R: PageRenderer> {
    config: PanelConfig,
    entities: EntityStore,
    pages: PageSet,
    nav: NavState,
    scheduler: CommandScheduler,
    timers: DebounceTable<TimerKey, ()>,
    presses: PressTracker,
    clock: WallClock,
    backend: B,
    renderer: R,
}

impl<B: Backend, R: PageRenderer> Controller<B, R> {
    /// Create a controller over pages whose items were bound to `entities`
    pub fn new(config: PanelConfig, entities: EntityStore, pages: PageSet, backend: B, renderer: R) -> Self {
        let scheduler = CommandScheduler::new(config.timing.command_cooldown_ms);
        Self {
            config,
            entities,
            pages,
            nav: NavState::new(),
            scheduler,
            timers: DebounceTable::new(),
            presses: PressTracker::new(),
            clock: WallClock::new(),
            backend,
            renderer,
        }
    }

    pub fn stats(&self) -> Stats {
        Stats {
            pages: self.pages.len(),
            stateful_items: self.pages.stateful_count(),
            entities: self.entities.len(),
        }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn entities(&self) -> &EntityStore {
        &self.entities
    }

    pub fn pages(&self) -> &PageSet {
        &self.pages
    }

    pub fn scheduler(&self) -> &CommandScheduler {
        &self.scheduler
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Index of the page on screen
    pub fn current_page(&self) -> Option<usize> {
        self.nav.page()
    }

    /// Item uuid of the open popup
    pub fn popup_uuid(&self) -> Option<&str> {
        self.nav.popup()
    }

    /// Initial subscriptions: every supported entity with its attributes
    pub fn subscriptions(&self) -> impl Iterator<Item = (&str, &'static [&'static str])> + '_ {
        self.entities
            .iter()
            .filter_map(|(_, entity)| entity.kind().map(|kind| (entity.id(), kind.subscribed_attributes())))
    }

    /// Set the wall clock from the backend
    pub fn sync_time(&mut self, epoch_seconds: i64, now_ms: u32) {
        if !self.clock.is_valid() {
            info!("Wall clock synced");
        }
        self.clock.sync(epoch_seconds, now_ms);
    }

    /// Bring the panel up: dim levels first, then the ambient page
    pub fn start(&mut self) {
        let display = self.config.display;
        self.set_display_dim(display.inactive_dim, display.active_dim);
        self.goto(NavTarget::Ambient);
    }

    /// Handle one decoded frame from the panel
    pub fn handle_payload(&mut self, payload: &[u8], now_ms: u32) {
        match PanelEvent::parse(payload) {
            Ok(event) => self.handle_event(event, now_ms),
            Err(e) => warn!("Ignoring panel message: {:?}", e),
        }
    }

    pub fn handle_event(&mut self, event: PanelEvent<'_>, now_ms: u32) {
        match event {
            PanelEvent::Startup => {
                info!("Panel started");
                self.start();
            }
            PanelEvent::SleepReached => {
                self.drop_pending_press();
                self.goto(NavTarget::Ambient);
            }
            PanelEvent::OpenDetail { id } => self.open_popup(id, now_ms),
            PanelEvent::ButtonPress { id, button, value } => self.on_press(id, button, value, now_ms),
        }
    }

    fn on_press(&mut self, id: &str, button: &str, value: Option<&str>, now_ms: u32) {
        let Some(button_type) = ButtonType::parse(button) else {
            debug!("Unhandled button type {=str}", button);
            return;
        };

        if let Some(action) = dispatch::control_action(id, button_type) {
            self.drop_pending_press();
            self.execute(action);
            return;
        }

        match self.presses.observe(id, button, value) {
            PressOutcome::Dispatch { cancel_replay } => {
                if cancel_replay {
                    self.timers.cancel(&TimerKey::ButtonPress);
                }
                self.perform_press(id, button_type, value);
            }
            PressOutcome::Swallow { arm_replay } => {
                if arm_replay {
                    self.timers
                        .schedule(TimerKey::ButtonPress, (), now_ms, self.config.timing.debounce_ms);
                }
            }
        }
    }

    /// Leaving the page discards a slider value still waiting for replay
    fn drop_pending_press(&mut self) {
        if self.presses.is_armed() {
            debug!("Pending press replay cancelled");
        }
        self.timers.cancel(&TimerKey::ButtonPress);
        self.presses.reset();
    }

    fn perform_press(&mut self, id: &str, button: ButtonType, value: Option<&str>) {
        let resolved = match dispatch::resolve_id(id, &self.pages) {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!("Press on {=str}: {:?}", id, e);
                return;
            }
        };

        match dispatch::dispatch(&resolved, button, value, &self.pages, &self.entities) {
            Ok(Some(action)) => self.execute(action),
            Ok(None) => debug!("Press on {=str} has no action", resolved.as_str()),
            Err(e) => warn!("Press on {=str}: {:?}", resolved.as_str(), e),
        }
    }

    fn execute(&mut self, action: Action) {
        match action {
            Action::Navigate(target) => self.goto(target),
            Action::RenderCurrent => self.render_current_page(),
            Action::Service(call) => {
                debug!("Service call {=str}", call.service.as_str());
                self.backend.call_service(call);
            }
        }
    }

    /// Apply a backend update
    ///
    /// Returns follow-up attributes to subscribe to for this entity.
    /// Updates for entities no page uses are dropped.
    pub fn on_update(&mut self, entity_id: &str, attribute: &str, value: &str, now_ms: u32) -> &'static [&'static str] {
        let handle = match self.entities.set_attribute(entity_id, attribute, value) {
            Ok(handle) => handle,
            Err(e) => {
                warn!("Update for {=str}: {:?}", entity_id, e);
                return &[];
            }
        };
        trace!("{=str}.{=str} = {=str}", entity_id, attribute, value);

        self.timers
            .schedule(TimerKey::Entity(handle), (), now_ms, self.config.timing.debounce_ms);

        let is_light = self.entities.get(handle).and_then(|e| e.kind()) == Some(EntityKind::Light);
        if is_light && attribute == attr::SUPPORTED_COLOR_MODES {
            color_mode_attributes(value)
        } else {
            &[]
        }
    }

    /// Drive timers and redraws, then release at most one frame
    pub fn tick(&mut self, now_ms: u32) -> Option<Vec<u8>> {
        while let Some((key, ())) = self.timers.take_due(now_ms) {
            match key {
                TimerKey::ButtonPress => self.replay_press(),
                TimerKey::Entity(handle) => self.entity_settled(handle),
            }
        }

        if self.nav.take_update() {
            if self.nav.popup().is_some() {
                self.render_popup(now_ms);
            } else {
                self.render_items();
            }
        }

        self.scheduler.poll(now_ms)
    }

    fn replay_press(&mut self) {
        let Some(press) = self.presses.replay() else {
            return;
        };
        let Some(button) = ButtonType::parse(&press.button) else {
            return;
        };
        self.perform_press(&press.id, button, press.value.as_deref());
    }

    fn entity_settled(&mut self, handle: EntityHandle) {
        if self.nav.is_update_pending() {
            return;
        }
        let Some(page) = self.nav.page().and_then(|index| self.pages.get(index)) else {
            return;
        };

        let relevant = if page.is_screensaver() {
            self.renderer.is_status_relevant(page, &self.entities, handle)
        } else {
            page.shows_entity(handle)
        };
        if relevant {
            self.nav.request_update();
        }
    }

    /// Navigate and redraw
    ///
    /// Targets that resolve outside the page set are ignored.
    pub fn goto(&mut self, target: NavTarget) {
        let bounds = PageBounds {
            len: self.pages.len(),
            start: self.pages.start_index(),
            has_ambient: self.pages.has_screensaver(),
        };
        let Some(index) = target.resolve(self.nav.page(), bounds) else {
            warn!("Navigation to {:?} ignored", target);
            return;
        };

        debug!("Showing page {}", index);
        self.nav.set_page(index);
        self.render_current_page();
    }

    /// Send the current page from scratch
    ///
    /// Page type, then the page's sleep timeout, then its content. Any
    /// open popup is closed.
    pub fn render_current_page(&mut self) {
        let Some(page) = self.nav.page().and_then(|index| self.pages.get(index)) else {
            return;
        };

        CommandWriter::page_type(self.scheduler.stage(), page.kind.as_str());
        self.scheduler.submit();
        self.nav.close_popup();
        CommandWriter::timeout(self.scheduler.stage(), page.sleep_timeout);
        self.scheduler.submit();
        self.render_items();
    }

    /// Redraw the content of the current page without changing its type
    fn render_items(&mut self) {
        let Some(page) = self.nav.page().and_then(|index| self.pages.get(index)) else {
            return;
        };

        self.renderer
            .render(page, &self.entities, self.scheduler.stage());
        self.scheduler.submit();

        if page.is_screensaver() {
            let out = self.scheduler.stage();
            if !self.renderer.render_status_update(page, &self.entities, out) {
                out.clear();
            }
            self.scheduler.submit();
        }
    }

    /// Open the detail popup for a `uuid.<item>` reference
    ///
    /// Only light and timer items on the current page have a popup;
    /// anything else is ignored.
    pub fn open_popup(&mut self, id: &str, now_ms: u32) {
        let Some(uuid) = item_uuid(id) else {
            warn!("Popup for {=str} ignored", id);
            return;
        };
        let has_detail = self
            .nav
            .page()
            .and_then(|index| self.pages.get(index))
            .and_then(|page| page.stateful_item(uuid))
            .and_then(|item| item.stateful)
            .is_some_and(|binding| binding.kind.has_detail());
        if !has_detail {
            debug!("No popup for {=str}", uuid);
            return;
        }

        self.nav.open_popup(uuid);
        self.render_popup(now_ms);
    }

    fn render_popup(&mut self, now_ms: u32) {
        let Some(item) = self
            .nav
            .page()
            .and_then(|index| self.pages.get(index))
            .zip(self.nav.popup())
            .and_then(|(page, uuid)| page.stateful_item(uuid))
        else {
            return;
        };

        let out = self.scheduler.stage();
        match render_detail(item, &self.entities, self.clock.now(now_ms), out) {
            Ok(kind) => {
                self.scheduler.submit();
                let timing = &self.config.timing;
                let timeout = if kind == EntityKind::Timer {
                    timing.timer_popup_timeout_s
                } else {
                    timing.light_popup_timeout_s
                };
                CommandWriter::timeout(self.scheduler.stage(), timeout);
                self.scheduler.submit();
            }
            Err(e) => {
                out.clear();
                warn!("Popup render failed: {:?}", e);
                self.render_current_page();
            }
        }
    }

    /// Store and send new dim levels
    ///
    /// Levels are corrected before use; see [`DisplayConfig::corrected`].
    pub fn set_display_dim(&mut self, inactive: u8, active: u8) {
        let display = DisplayConfig {
            inactive_dim: inactive,
            active_dim: active,
            ..self.config.display
        }
        .corrected();
        self.config.display = display;
        CommandWriter::dim_mode(
            self.scheduler.stage(),
            display.inactive_dim,
            display.active_dim,
            display.background,
        );
        self.scheduler.submit();
    }

    /// Override the panel sleep timeout until the next page render
    pub fn set_display_timeout(&mut self, seconds: u16) {
        CommandWriter::timeout(self.scheduler.stage(), seconds);
        self.scheduler.submit();
    }
}
