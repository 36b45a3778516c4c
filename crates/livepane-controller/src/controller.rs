//! Admin-side preview controller.
//!
//! One [`PreviewController`] owns every preview store of an admin session and
//! the key of the store whose editor is active. All side effects go through
//! the [`PreviewHost`]; nothing here fails into the host, problems surface as
//! a store status and note.

use std::collections::{BTreeMap, HashMap};

use livepane_core::{Config, Locale};
use livepane_protocol::{Message, UpdatePayload, accepts_origin};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    assets::{AssetResolver, MediaHeuristic, build_resolved_assets, has_blob_asset},
    entry::EntrySnapshot,
    focus,
    host::{ClipboardWrite, FormControl, PreviewHost, TimerId},
    store::{Mode, PreviewStatus, PreviewStore, StoreKey, Viewport},
};

/// Note shown while a payload references unpublished uploads.
pub const NOTE_BLOB_ASSETS: &str = "Using local blob URLs for unpublished uploads.";

/// Note shown when the frame never reported ready.
pub const NOTE_HANDSHAKE_TIMEOUT: &str = "Preview bridge timeout. Showing structured fallback.";

/// Tunables of the bridge, usually taken from [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeSettings {
    /// Origin messages must come from.
    pub origin: String,
    pub debounce_ms: u64,
    pub handshake_timeout_ms: u64,
    /// Prefix of local upload URLs.
    pub blob_marker: String,
    /// Rich-text fingerprint the frame must report.
    pub signature: String,
    /// Minimum focus match score.
    pub min_score: u32,
    pub media: MediaHeuristic,
}

impl BridgeSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            origin: config.site.origin.clone(),
            debounce_ms: config.bridge.debounce_ms,
            handshake_timeout_ms: config.bridge.handshake_timeout_ms,
            blob_marker: config.bridge.blob_marker.clone(),
            signature: config.bridge.signature.clone(),
            min_score: config.focus.min_score,
            media: MediaHeuristic::from_config(&config.media),
        }
    }

    /// Same settings, accepting messages from `origin`.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    Update,
    Handshake,
}

/// Owner of all preview stores of an admin session.
#[derive(Debug)]
pub struct PreviewController<H> {
    host: H,
    settings: BridgeSettings,
    stores: BTreeMap<StoreKey, PreviewStore>,
    active: Option<StoreKey>,
    timers: HashMap<TimerId, (StoreKey, TimerKind)>,
}

impl<H: PreviewHost> PreviewController<H> {
    pub fn new(host: H, settings: BridgeSettings) -> Self {
        Self {
            host,
            settings,
            stores: BTreeMap::new(),
            active: None,
            timers: HashMap::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn settings(&self) -> &BridgeSettings {
        &self.settings
    }

    pub fn store(&self, key: &StoreKey) -> Option<&PreviewStore> {
        self.stores.get(key)
    }

    pub fn stores(&self) -> impl Iterator<Item = &PreviewStore> {
        self.stores.values()
    }

    /// Key of the store whose editor is open.
    pub fn active_key(&self) -> Option<&StoreKey> {
        self.active.as_ref()
    }

    /// Return the store for `key`, creating it in `mode` if absent.
    ///
    /// An existing store keeps its original mode.
    pub fn ensure_store(&mut self, key: StoreKey, mode: Mode) -> &mut PreviewStore {
        self.stores.entry(key.clone()).or_insert_with(|| {
            info!(store = %key, %mode, "creating preview store");
            PreviewStore::new(key, mode)
        })
    }

    /// Refresh the preview of an entry the editor renders.
    ///
    /// Creates the store if needed, makes it active, rebuilds its payload,
    /// binds the frame and queues a debounced update.
    pub fn render_entry(
        &mut self,
        entry: &EntrySnapshot,
        mode: Mode,
        resolver: &dyn AssetResolver,
    ) -> StoreKey {
        let slug = entry.normalized_slug();
        let key = StoreKey::derive(mode, &slug);

        self.ensure_store(key.clone(), mode);
        self.active = Some(key.clone());

        let payload = self.build_payload(&key, entry, resolver);
        if let Some(store) = self.stores.get_mut(&key) {
            store.source = store.mode.source(&slug);
            store.latest_payload = payload;
        }

        self.bind(&key);
        self.queue_update(&key, false);
        key
    }

    /// Snapshot `entry` for the store's frame.
    ///
    /// Every media reference is resolved; local upload URLs set the store to
    /// `asset pending`.
    pub fn build_payload(
        &mut self,
        key: &StoreKey,
        entry: &EntrySnapshot,
        resolver: &dyn AssetResolver,
    ) -> Option<UpdatePayload> {
        let sent_at = self.host.now_ms();
        let store = self.stores.get_mut(key)?;

        let data = entry.data();
        let resolved_assets = build_resolved_assets(&data, &self.settings.media, resolver);
        if has_blob_asset(&resolved_assets, &self.settings.blob_marker) {
            store.set_status(PreviewStatus::AssetPending, NOTE_BLOB_ASSETS);
        }

        Some(UpdatePayload {
            page: store.mode.page(),
            collection: store.mode.collection(),
            slug: entry.slug().to_string(),
            locale: store.locale,
            highlight: store.highlight,
            active_path: store.active_path.clone(),
            data,
            resolved_assets,
            sent_at,
        })
    }

    /// Attach the store to its frame.
    ///
    /// Points the frame at the store's source when it changed, which
    /// requires a new handshake, and starts the handshake timer if the frame
    /// is not ready.
    pub fn bind(&mut self, key: &StoreKey) {
        let Self {
            host,
            stores,
            timers,
            settings,
            ..
        } = self;
        let Some(store) = stores.get_mut(key) else {
            return;
        };

        if store.loaded_source.as_deref() != Some(store.source.as_str()) {
            debug!(store = %key, source = %store.source, "loading preview frame");
            store.ready = false;
            host.load_frame(key, &store.source);
            store.loaded_source = Some(store.source.clone());
        }

        if !store.ready && store.handshake_timer.is_none() {
            let timer = host.schedule(settings.handshake_timeout_ms);
            store.handshake_timer = Some(timer);
            timers.insert(timer, (key.clone(), TimerKind::Handshake));
        }

        host.store_changed(store);
    }

    /// Queue the cached payload for sending.
    ///
    /// Before the frame is ready nothing is sent and the store shows
    /// `loading`. Otherwise a pending send is replaced, either by an
    /// immediate send or by a new debounce timer.
    pub fn queue_update(&mut self, key: &StoreKey, immediate: bool) {
        let Self {
            host,
            stores,
            timers,
            settings,
            ..
        } = self;
        let Some(store) = stores.get_mut(key) else {
            return;
        };
        if store.latest_payload.is_none() {
            return;
        }

        if !store.ready {
            store.set_status_keep_note(PreviewStatus::Loading);
            host.store_changed(store);
            return;
        }

        if let Some(timer) = store.update_timer.take() {
            host.cancel(timer);
            timers.remove(&timer);
        }

        if immediate {
            flush(host, store);
        } else {
            let timer = host.schedule(settings.debounce_ms);
            store.update_timer = Some(timer);
            timers.insert(timer, (key.clone(), TimerKind::Update));
        }

        host.store_changed(store);
    }

    /// Send the cached payload now if the frame is ready.
    pub fn flush_update(&mut self, key: &StoreKey) -> bool {
        let Some(store) = self.stores.get_mut(key) else {
            return false;
        };
        let sent = flush(&mut self.host, store);
        self.host.store_changed(store);
        sent
    }

    /// A timer scheduled through the host fired.
    pub fn on_timer(&mut self, timer: TimerId) {
        let Some((key, kind)) = self.timers.remove(&timer) else {
            debug!(timer, "ignoring stale timer");
            return;
        };
        let Self { host, stores, .. } = self;
        let Some(store) = stores.get_mut(&key) else {
            return;
        };

        match kind {
            TimerKind::Update => {
                if store.update_timer != Some(timer) {
                    return;
                }
                store.update_timer = None;
                flush(host, store);
            }
            TimerKind::Handshake => {
                if store.handshake_timer != Some(timer) {
                    return;
                }
                store.handshake_timer = None;
                if !store.ready {
                    warn!(store = %key, "preview bridge handshake timed out");
                    store.handshake_timeout = true;
                    store.fallback_visible = true;
                    store.set_status(PreviewStatus::RenderWarning, NOTE_HANDSHAKE_TIMEOUT);
                }
            }
        }

        host.store_changed(store);
    }

    /// Switch the display locale.
    ///
    /// A ready frame gets a locale-only message first, then the full
    /// payload with the new locale.
    pub fn set_locale(&mut self, key: &StoreKey, locale: Locale) {
        {
            let Self { host, stores, .. } = self;
            let Some(store) = stores.get_mut(key) else {
                return;
            };
            if store.locale == locale {
                return;
            }

            store.locale = locale;
            if store.ready {
                host.post_to_frame(key, &Message::SetLocale { locale });
            }
            if let Some(payload) = store.latest_payload.as_mut() {
                payload.locale = locale;
            }
            store.set_status(
                PreviewStatus::Updating,
                format!("Locale switched to {}.", locale.label()),
            );
            host.store_changed(store);
        }

        self.queue_update(key, true);
    }

    /// Change the simulated device width.
    pub fn set_viewport(&mut self, key: &StoreKey, viewport: Viewport) {
        let Some(store) = self.stores.get_mut(key) else {
            return;
        };
        if store.viewport == viewport {
            return;
        }
        store.viewport = viewport;
        self.host.store_changed(store);
    }

    /// Flip region highlighting.
    pub fn toggle_highlight(&mut self, key: &StoreKey) {
        let Some(store) = self.stores.get_mut(key) else {
            return;
        };

        store.highlight = !store.highlight;
        if let Some(payload) = store.latest_payload.as_mut() {
            payload.highlight = store.highlight;
            payload.active_path = store.active_path.clone();
        }
        self.host.store_changed(store);

        self.queue_update(key, false);
    }

    /// Handle a message received from the frame bound to `key`.
    ///
    /// Messages from other origins, for unknown stores or with another
    /// protocol version are dropped.
    pub fn handle_message(&mut self, origin: &str, key: &StoreKey, raw: &Value) {
        if !accepts_origin(&self.settings.origin, origin) {
            debug!(origin, "dropping message from foreign origin");
            return;
        }
        if !self.stores.contains_key(key) {
            debug!(store = %key, "dropping message for unknown store");
            return;
        }
        let Some(message) = Message::decode(raw) else {
            return;
        };

        match message {
            Message::Ready { signature } => self.on_ready(key, &signature),
            Message::Ack {
                status,
                message,
                signature,
            } => self.on_ack(key, &status, &message, &signature),
            Message::RequestFocus { path } => self.handle_focus_request(key, &path),
            other => debug!(kind = other.type_name(), "ignoring message meant for the frame"),
        }
    }

    fn on_ready(&mut self, key: &StoreKey, signature: &str) {
        {
            let Self {
                host,
                stores,
                timers,
                ..
            } = self;
            let Some(store) = stores.get_mut(key) else {
                return;
            };

            info!(store = %key, "preview frame ready");
            store.ready = true;
            store.handshake_timeout = false;
            store.fallback_visible = false;
            if let Some(timer) = store.handshake_timer.take() {
                host.cancel(timer);
                timers.remove(&timer);
            }
            store.set_status(PreviewStatus::Synced, "");
            host.store_changed(store);
        }

        self.queue_update(key, true);
        self.check_signature(key, signature);
    }

    fn on_ack(&mut self, key: &StoreKey, status: &str, message: &str, signature: &str) {
        if !self.check_signature(key, signature) {
            return;
        }
        let Some(store) = self.stores.get_mut(key) else {
            return;
        };
        let status = PreviewStatus::from_wire(status).unwrap_or(PreviewStatus::Synced);
        store.set_status(status, message);
        self.host.store_changed(store);
    }

    /// Surface a rich-text fingerprint mismatch. Returns whether it matched.
    fn check_signature(&mut self, key: &StoreKey, signature: &str) -> bool {
        if signature == self.settings.signature {
            return true;
        }

        warn!(
            store = %key,
            frame = signature,
            expected = %self.settings.signature,
            "rich-text configuration mismatch"
        );
        if let Some(store) = self.stores.get_mut(key) {
            let reported = if signature.is_empty() { "none" } else { signature };
            store.set_status(
                PreviewStatus::RenderWarning,
                format!(
                    "Rich-text config mismatch: frame reports {reported}, expected {}.",
                    self.settings.signature
                ),
            );
            self.host.store_changed(store);
        }
        false
    }

    /// Focus the form control that best matches a content path.
    ///
    /// Without a match the path is copied to the clipboard so the editor can
    /// search for it.
    pub fn handle_focus_request(&mut self, key: &StoreKey, path: &str) {
        let path = path.trim();
        if path.is_empty() || !self.stores.contains_key(key) {
            return;
        }

        let controls = self.host.controls();
        let matched = focus::find_best_match(&controls, path, self.settings.min_score);

        let (status, note) = match matched {
            Some(index) if self.host.focus_control(index) => {
                (PreviewStatus::Synced, format!("Focused field for {path}."))
            }
            _ => match self.host.write_clipboard(key, path) {
                Ok(ClipboardWrite::Written) => (
                    PreviewStatus::RenderWarning,
                    format!("No direct field match. Copied path: {path}"),
                ),
                Ok(ClipboardWrite::Pending) => return,
                Err(err) => {
                    debug!(%err, "clipboard unavailable for focus fallback");
                    (
                        PreviewStatus::RenderWarning,
                        format!("No direct field match for {path}."),
                    )
                }
            },
        };

        if let Some(store) = self.stores.get_mut(key) {
            store.set_status(status, note);
            self.host.store_changed(store);
        }
    }

    /// Report the outcome of a pending clipboard write.
    pub fn clipboard_settled(&mut self, key: &StoreKey, path: &str, copied: bool) {
        let Some(store) = self.stores.get_mut(key) else {
            return;
        };
        let note = if copied {
            format!("No direct field match. Copied path: {path}")
        } else {
            format!("No direct field match for {path}.")
        };
        store.set_status(PreviewStatus::RenderWarning, note);
        self.host.store_changed(store);
    }

    /// A form control of the active editor received focus.
    ///
    /// While highlighting is on, the control's content path becomes the
    /// active path and is sent with the next debounced update.
    pub fn handle_field_focus(&mut self, control: &FormControl) {
        let Some(key) = self.active.clone() else {
            return;
        };
        let Some(store) = self.stores.get_mut(&key) else {
            return;
        };
        if !store.highlight {
            return;
        }
        let Some(path) = control.identifier().and_then(focus::normalize_field_path) else {
            return;
        };

        debug!(store = %key, path = %path, "tracking focused field");
        store.active_path = Some(path.clone());
        if let Some(payload) = store.latest_payload.as_mut() {
            payload.active_path = Some(path);
        }

        self.queue_update(&key, false);
    }
}

/// Post the cached payload; a successful send shows `updating` unless
/// assets are pending.
fn flush<H: PreviewHost>(host: &mut H, store: &mut PreviewStore) -> bool {
    if !store.ready {
        return false;
    }
    let Some(payload) = store.latest_payload.clone() else {
        return false;
    };

    let sent = host.post_to_frame(&store.key, &Message::Update { payload });
    if sent && store.status != PreviewStatus::AssetPending {
        store.set_status_keep_note(PreviewStatus::Updating);
    }
    sent
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{assets::IdentityResolver, error::AssetError, error::ClipboardError};

    const ORIGIN: &str = "http://localhost:4321";

    #[derive(Debug, Default)]
    struct TestHost {
        sent: Vec<(StoreKey, Message)>,
        loads: Vec<(StoreKey, String)>,
        scheduled: Vec<(TimerId, u64)>,
        cancelled: Vec<TimerId>,
        next_timer: TimerId,
        controls: Vec<FormControl>,
        focused: Vec<usize>,
        clipboard: Option<Result<ClipboardWrite, ClipboardError>>,
        copied: Vec<String>,
        frame_mounted: bool,
    }

    impl PreviewHost for TestHost {
        fn post_to_frame(&mut self, key: &StoreKey, message: &Message) -> bool {
            if !self.frame_mounted {
                return false;
            }
            self.sent.push((key.clone(), message.clone()));
            true
        }

        fn load_frame(&mut self, key: &StoreKey, source: &str) {
            self.loads.push((key.clone(), source.to_string()));
        }

        fn schedule(&mut self, delay_ms: u64) -> TimerId {
            self.next_timer += 1;
            self.scheduled.push((self.next_timer, delay_ms));
            self.next_timer
        }

        fn cancel(&mut self, timer: TimerId) {
            self.cancelled.push(timer);
        }

        fn controls(&self) -> Vec<FormControl> {
            self.controls.clone()
        }

        fn focus_control(&mut self, index: usize) -> bool {
            self.focused.push(index);
            true
        }

        fn write_clipboard(
            &mut self,
            _key: &StoreKey,
            text: &str,
        ) -> Result<ClipboardWrite, ClipboardError> {
            let outcome = self.clipboard.clone().unwrap_or(Err(ClipboardError::Unavailable));
            if outcome.is_ok() {
                self.copied.push(text.to_string());
            }
            outcome
        }

        fn now_ms(&self) -> u64 {
            1_767_225_600_000
        }
    }

    impl TestHost {
        fn last_timer(&self, delay: u64) -> TimerId {
            self.scheduled
                .iter()
                .rev()
                .find(|(_, d)| *d == delay)
                .map(|(id, _)| *id)
                .unwrap()
        }

        fn updates(&self) -> Vec<&UpdatePayload> {
            self.sent
                .iter()
                .filter_map(|(_, m)| match m {
                    Message::Update { payload } => Some(payload),
                    _ => None,
                })
                .collect()
        }
    }

    fn controller() -> PreviewController<TestHost> {
        let host = TestHost {
            frame_mounted: true,
            ..TestHost::default()
        };
        PreviewController::new(host, BridgeSettings::default())
    }

    fn home_entry(headline: &str) -> EntrySnapshot {
        EntrySnapshot::new(
            "home",
            json!({"hero": {"headline": {"de": headline, "en": "Hi"}}}),
        )
    }

    fn ready(ctl: &mut PreviewController<TestHost>, key: &StoreKey) {
        let msg = Message::Ready {
            signature: ctl.settings().signature.clone(),
        }
        .encode()
        .unwrap();
        ctl.handle_message(ORIGIN, key, &msg);
    }

    #[test]
    fn test_ensure_store_is_idempotent() {
        let mut ctl = controller();
        let key = StoreKey::derive(Mode::Home, "home");

        ctl.ensure_store(key.clone(), Mode::Home).highlight = true;
        let store = ctl.ensure_store(key.clone(), Mode::Apartments);

        assert!(store.highlight);
        assert_eq!(store.mode, Mode::Home);
        assert_eq!(ctl.stores().count(), 1);
    }

    #[test]
    fn test_render_entry_binds_and_waits_for_ready() {
        let mut ctl = controller();
        let key = ctl.render_entry(&home_entry("Hallo"), Mode::Home, &IdentityResolver);

        assert_eq!(key.as_str(), "home-home");
        assert_eq!(ctl.active_key(), Some(&key));
        assert_eq!(
            ctl.host().loads,
            vec![(key.clone(), "/cms-preview/home?cmsPreview=1".to_string())]
        );

        let store = ctl.store(&key).unwrap();
        assert_eq!(store.status, PreviewStatus::Loading);
        assert!(store.awaiting_handshake());
        assert!(ctl.host().sent.is_empty());
        assert_eq!(ctl.host().scheduled, vec![(1, 2000)]);
    }

    #[test]
    fn test_nothing_sent_before_ready_then_one_resend() {
        let mut ctl = controller();
        let key = ctl.render_entry(&home_entry("A"), Mode::Home, &IdentityResolver);
        ctl.render_entry(&home_entry("B"), Mode::Home, &IdentityResolver);
        ctl.queue_update(&key, true);
        assert!(ctl.host().sent.is_empty());

        ready(&mut ctl, &key);

        let updates = ctl.host().updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].data["hero"]["headline"]["de"], "B");
        assert!(ctl.host().cancelled.contains(&1));
        assert_eq!(ctl.store(&key).unwrap().status, PreviewStatus::Updating);
    }

    #[test]
    fn test_debounce_collapses_bursts() {
        let mut ctl = controller();
        let key = ctl.render_entry(&home_entry("A"), Mode::Home, &IdentityResolver);
        ready(&mut ctl, &key);
        ctl.host_mut().sent.clear();

        for text in ["Ha", "Hal", "Hall", "Hallo"] {
            ctl.render_entry(&home_entry(text), Mode::Home, &IdentityResolver);
        }
        assert!(ctl.host().sent.is_empty());
        assert!(ctl.store(&key).unwrap().has_pending_update());

        let live = ctl.host().last_timer(120);
        for (id, delay) in ctl.host().scheduled.clone() {
            if delay == 120 && id != live {
                ctl.on_timer(id);
            }
        }
        assert!(ctl.host().sent.is_empty());

        ctl.on_timer(live);
        let updates = ctl.host().updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].data["hero"]["headline"]["de"], "Hallo");
        assert!(!ctl.store(&key).unwrap().has_pending_update());
    }

    #[test]
    fn test_immediate_cancels_pending_timer() {
        let mut ctl = controller();
        let key = ctl.render_entry(&home_entry("A"), Mode::Home, &IdentityResolver);
        ready(&mut ctl, &key);
        ctl.host_mut().sent.clear();

        ctl.queue_update(&key, false);
        let pending = ctl.host().last_timer(120);
        ctl.queue_update(&key, true);

        assert_eq!(ctl.host().updates().len(), 1);
        assert!(ctl.host().cancelled.contains(&pending));

        ctl.on_timer(pending);
        assert_eq!(ctl.host().updates().len(), 1);
    }

    #[test]
    fn test_handshake_timeout_and_late_ready() {
        let mut ctl = controller();
        let key = ctl.render_entry(&home_entry("Hallo"), Mode::Home, &IdentityResolver);

        ctl.on_timer(ctl.host().last_timer(2000));
        let store = ctl.store(&key).unwrap();
        assert!(store.handshake_timeout);
        assert!(store.fallback_visible);
        assert_eq!(store.status, PreviewStatus::RenderWarning);
        assert_eq!(store.status_note, NOTE_HANDSHAKE_TIMEOUT);
        assert!(store.fallback_json().contains("Hallo"));

        ready(&mut ctl, &key);
        let store = ctl.store(&key).unwrap();
        assert!(!store.handshake_timeout);
        assert!(!store.fallback_visible);
        assert_eq!(ctl.host().updates().len(), 1);

        let ack = Message::Ack {
            status: "synced".to_string(),
            message: String::new(),
            signature: ctl.settings().signature.clone(),
        }
        .encode()
        .unwrap();
        ctl.handle_message(ORIGIN, &key, &ack);
        assert_eq!(ctl.store(&key).unwrap().status, PreviewStatus::Synced);
    }

    #[test]
    fn test_blob_assets_mark_pending_but_still_send() {
        let mut ctl = controller();
        let key = ctl.render_entry(&home_entry("A"), Mode::Home, &IdentityResolver);
        ready(&mut ctl, &key);

        let entry = EntrySnapshot::new(
            "home",
            json!({"hero": {"images": {"desktop": "/images/new.jpg"}}}),
        );
        let resolver = |reference: &str| -> Result<Option<String>, AssetError> {
            Ok(Some(format!("blob:{ORIGIN}/{reference}")))
        };
        ctl.render_entry(&entry, Mode::Home, &resolver);
        ctl.on_timer(ctl.host().last_timer(120));

        let store = ctl.store(&key).unwrap();
        assert_eq!(store.status, PreviewStatus::AssetPending);
        assert_eq!(store.status_note, NOTE_BLOB_ASSETS);

        let updates = ctl.host().updates();
        let last = updates.last().unwrap();
        assert!(last.resolved_assets["/images/new.jpg"].starts_with("blob:"));
    }

    #[test]
    fn test_set_locale_patches_payload() {
        let mut ctl = controller();
        let key = ctl.render_entry(&home_entry("Hallo"), Mode::Home, &IdentityResolver);
        ready(&mut ctl, &key);
        ctl.host_mut().sent.clear();

        ctl.set_locale(&key, Locale::En);
        ctl.set_locale(&key, Locale::En);

        let sent = &ctl.host().sent;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].1, Message::SetLocale { locale: Locale::En });
        match &sent[1].1 {
            Message::Update { payload } => assert_eq!(payload.locale, Locale::En),
            other => panic!("expected update, got {other:?}"),
        }
        assert_eq!(ctl.store(&key).unwrap().status_note, "Locale switched to EN.");
    }

    #[test]
    fn test_set_locale_before_ready_sends_nothing() {
        let mut ctl = controller();
        let key = ctl.render_entry(&home_entry("Hallo"), Mode::Home, &IdentityResolver);
        ctl.set_locale(&key, Locale::En);

        assert!(ctl.host().sent.is_empty());
        let store = ctl.store(&key).unwrap();
        assert_eq!(store.latest_payload.as_ref().unwrap().locale, Locale::En);
        assert_eq!(store.status, PreviewStatus::Loading);
    }

    #[test]
    fn test_viewport_and_highlight() {
        let mut ctl = controller();
        let key = ctl.render_entry(&home_entry("Hallo"), Mode::Home, &IdentityResolver);

        ctl.set_viewport(&key, Viewport::Mobile);
        assert_eq!(ctl.store(&key).unwrap().viewport.width(), "430px");

        ctl.toggle_highlight(&key);
        let store = ctl.store(&key).unwrap();
        assert!(store.highlight);
        assert!(store.latest_payload.as_ref().unwrap().highlight);
        assert_eq!(store.highlight_label(), "Highlight: On");
    }

    #[test]
    fn test_messages_filtered_by_origin_store_and_version() {
        let mut ctl = controller();
        let key = ctl.render_entry(&home_entry("Hallo"), Mode::Home, &IdentityResolver);
        let msg = Message::Ready {
            signature: ctl.settings().signature.clone(),
        }
        .encode()
        .unwrap();

        ctl.handle_message("https://evil.example", &key, &msg);
        ctl.handle_message(ORIGIN, &StoreKey::new("apartments-x"), &msg);
        let mut wrong = msg.clone();
        wrong["version"] = json!(2);
        ctl.handle_message(ORIGIN, &key, &wrong);
        assert!(!ctl.store(&key).unwrap().ready);

        ctl.handle_message(ORIGIN, &key, &msg);
        assert!(ctl.store(&key).unwrap().ready);
    }

    #[test]
    fn test_signature_mismatch_is_a_warning() {
        let mut ctl = controller();
        let key = ctl.render_entry(&home_entry("Hallo"), Mode::Home, &IdentityResolver);
        let msg = Message::Ready {
            signature: "cms-richtext-v0".to_string(),
        }
        .encode()
        .unwrap();
        ctl.handle_message(ORIGIN, &key, &msg);

        let store = ctl.store(&key).unwrap();
        assert!(store.ready);
        assert_eq!(store.status, PreviewStatus::RenderWarning);
        assert!(store.status_note.contains("cms-richtext-v0"));
        assert_eq!(ctl.host().updates().len(), 1);
    }

    #[test]
    fn test_ack_status_and_unknown_status() {
        let mut ctl = controller();
        let key = ctl.render_entry(&home_entry("Hallo"), Mode::Home, &IdentityResolver);
        let signature = ctl.settings().signature.clone();

        let ack = json!({"version": 1, "type": "CMS_PREVIEW_ACK", "status": "render warning",
            "message": "Missing node", "signature": signature});
        ctl.handle_message(ORIGIN, &key, &ack);
        let store = ctl.store(&key).unwrap();
        assert_eq!(store.status, PreviewStatus::RenderWarning);
        assert_eq!(store.status_note, "Missing node");

        let ack = json!({"version": 1, "type": "CMS_PREVIEW_ACK", "status": "rendered",
            "signature": signature});
        ctl.handle_message(ORIGIN, &key, &ack);
        assert_eq!(ctl.store(&key).unwrap().status, PreviewStatus::Synced);
    }

    #[test]
    fn test_focus_request_paths() {
        let mut ctl = controller();
        let key = ctl.render_entry(&home_entry("Hallo"), Mode::Home, &IdentityResolver);
        ctl.host_mut().controls = vec![
            FormControl::named("title"),
            FormControl::named("hero.headline"),
        ];

        ctl.handle_focus_request(&key, "  hero.headline ");
        assert_eq!(ctl.host().focused, vec![1]);
        assert_eq!(
            ctl.store(&key).unwrap().status_note,
            "Focused field for hero.headline."
        );

        ctl.handle_focus_request(&key, "amenities");
        let store = ctl.store(&key).unwrap();
        assert_eq!(store.status, PreviewStatus::RenderWarning);
        assert_eq!(store.status_note, "No direct field match for amenities.");

        ctl.host_mut().clipboard = Some(Ok(ClipboardWrite::Written));
        ctl.handle_focus_request(&key, "amenities");
        assert_eq!(ctl.host().copied, vec!["amenities".to_string()]);
        assert_eq!(
            ctl.store(&key).unwrap().status_note,
            "No direct field match. Copied path: amenities"
        );

        ctl.handle_focus_request(&key, "   ");
        assert_eq!(ctl.host().copied.len(), 1);
    }

    #[test]
    fn test_pending_clipboard_settles_later() {
        let mut ctl = controller();
        let key = ctl.render_entry(&home_entry("Hallo"), Mode::Home, &IdentityResolver);
        ctl.host_mut().clipboard = Some(Ok(ClipboardWrite::Pending));

        ctl.handle_focus_request(&key, "images");
        assert_eq!(ctl.store(&key).unwrap().status, PreviewStatus::Loading);

        ctl.clipboard_settled(&key, "images", false);
        assert_eq!(
            ctl.store(&key).unwrap().status_note,
            "No direct field match for images."
        );
    }

    #[test]
    fn test_field_focus_tracks_active_path_when_highlighting() {
        let mut ctl = controller();
        let key = ctl.render_entry(&home_entry("Hallo"), Mode::Home, &IdentityResolver);
        let control = FormControl::named("data.hero.fields.headline");

        ctl.handle_field_focus(&control);
        assert_eq!(ctl.store(&key).unwrap().active_path, None);

        ctl.toggle_highlight(&key);
        ctl.handle_field_focus(&control);
        let store = ctl.store(&key).unwrap();
        assert_eq!(store.active_path.as_deref(), Some("hero.headline"));
        assert_eq!(
            store.latest_payload.as_ref().unwrap().active_path.as_deref(),
            Some("hero.headline")
        );
    }

    #[test]
    fn test_apartment_source_and_changed_source_requires_handshake() {
        let mut ctl = controller();
        let entry = EntrySnapshot::new("Studio 2", json!({"name": "Studio 2"}));
        let key = ctl.render_entry(&entry, Mode::Apartments, &IdentityResolver);
        assert_eq!(key.as_str(), "apartments-studio-2");
        assert_eq!(
            ctl.host().loads[0].1,
            "/cms-preview/apartment?cmsPreview=1&slug=studio%202"
        );

        ready(&mut ctl, &key);
        ctl.render_entry(&entry, Mode::Apartments, &IdentityResolver);
        assert_eq!(ctl.host().loads.len(), 1);
        assert!(ctl.store(&key).unwrap().ready);

        let payload = ctl.store(&key).unwrap().latest_payload.clone().unwrap();
        assert_eq!(payload.slug, "Studio 2");
        assert_eq!(payload.collection.as_str(), "apartments");
    }

    #[test]
    fn test_post_without_frame_is_a_noop() {
        let mut ctl = PreviewController::new(TestHost::default(), BridgeSettings::default());
        let key = ctl.render_entry(&home_entry("Hallo"), Mode::Home, &IdentityResolver);
        ready(&mut ctl, &key);

        assert!(!ctl.flush_update(&key));
        assert_eq!(ctl.store(&key).unwrap().status, PreviewStatus::Synced);
    }
}
