//! # Accessibility Primitives
//!
//! Host-agnostic versions of the two helpers the storefront modals rely on:
//! screen-reader announcements through a transient live region, and focus
//! trapping inside a dialog.
//!
//! The UI layer supplies the host (whatever owns the presentation tree);
//! this module owns only the timing and the wrap-around rules.
//!
//! ## Announcement Lifecycle
//! ```text
//! create_region ──(text_delay)──► set_text ──(removal_delay)──► remove_region
//!                                                     │
//!                                                     └─ skipped if the host
//!                                                        no longer has it
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// Live Region Announcer
// =============================================================================

/// How urgently assistive technology should read the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Politeness {
    /// Read when the user is idle.
    #[default]
    Polite,
    /// Interrupt whatever is being read.
    Assertive,
}

/// The presentation tree an [`Announcer`] writes into.
pub trait LiveRegionHost: Send + Sync {
    /// Handle to a created region.
    type Region: Send + Sync;

    /// Inserts an empty, visually hidden live region.
    fn create_region(&self, politeness: Politeness) -> Self::Region;

    /// Sets the region's text content.
    fn set_text(&self, region: &Self::Region, text: &str);

    /// False once the region has left the tree (page navigated away).
    fn is_attached(&self, region: &Self::Region) -> bool;

    /// Removes the region from the tree.
    fn remove_region(&self, region: Self::Region);
}

/// Delays used by [`Announcer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnouncerConfig {
    /// Wait between inserting the region and filling it, so the mutation
    /// is observed as new content.
    pub text_delay: Duration,
    /// How long the message stays in the tree.
    pub removal_delay: Duration,
}

impl Default for AnnouncerConfig {
    fn default() -> Self {
        AnnouncerConfig {
            text_delay: Duration::from_millis(100),
            removal_delay: Duration::from_millis(1000),
        }
    }
}

/// Announces short messages to screen readers.
pub struct Announcer<H> {
    host: Arc<H>,
    config: AnnouncerConfig,
}

impl<H> Clone for Announcer<H> {
    fn clone(&self) -> Self {
        Announcer {
            host: Arc::clone(&self.host),
            config: self.config,
        }
    }
}

impl<H: LiveRegionHost + 'static> Announcer<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self::with_config(host, AnnouncerConfig::default())
    }

    pub fn with_config(host: Arc<H>, config: AnnouncerConfig) -> Self {
        Announcer { host, config }
    }

    /// Runs one full announcement and resolves once the region is gone.
    ///
    /// There is no cancellation. If the host drops the region early, the
    /// remaining steps are skipped without error.
    pub async fn announce(&self, message: &str, politeness: Politeness) {
        let region = self.host.create_region(politeness);

        tokio::time::sleep(self.config.text_delay).await;
        if !self.host.is_attached(&region) {
            return;
        }
        self.host.set_text(&region, message);

        tokio::time::sleep(self.config.removal_delay).await;
        if self.host.is_attached(&region) {
            self.host.remove_region(region);
        }
    }

    /// Fire-and-forget variant; the caller does not wait for removal.
    pub fn spawn_announce(
        &self,
        message: impl Into<String>,
        politeness: Politeness,
    ) -> tokio::task::JoinHandle<()> {
        let announcer = self.clone();
        let message = message.into();
        tokio::spawn(async move { announcer.announce(&message, politeness).await })
    }
}

// =============================================================================
// Focus Trap
// =============================================================================

/// What the host should do with a Tab key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabOutcome<F> {
    /// Prevent the default move and focus this element instead.
    Wrap(F),
    /// Let the host move focus normally.
    Default,
}

/// Keeps keyboard focus cycling inside a fixed set of elements.
///
/// The set is captured once at activation and never re-scanned. The trap
/// runs its release action exactly once, on [`FocusTrap::release`] or when
/// dropped.
pub struct FocusTrap<F> {
    focusables: Vec<F>,
    on_release: Option<Box<dyn FnOnce() + Send>>,
}

impl<F: PartialEq + Clone> FocusTrap<F> {
    /// Captures `focusables` (in tab order) and arms the trap.
    ///
    /// `on_release` is the teardown the caller owns, typically detaching
    /// the key listener.
    pub fn activate<I, R>(focusables: I, on_release: R) -> Self
    where
        I: IntoIterator<Item = F>,
        R: FnOnce() + Send + 'static,
    {
        FocusTrap {
            focusables: focusables.into_iter().collect(),
            on_release: Some(Box::new(on_release)),
        }
    }

    /// Element to focus when the dialog opens.
    pub fn initial_focus(&self) -> Option<&F> {
        self.focusables.first()
    }

    pub fn focusables(&self) -> &[F] {
        &self.focusables
    }

    /// Decides where a Tab (or Shift+Tab when `shift`) press goes.
    ///
    /// - Shift+Tab on the first element wraps to the last
    /// - Tab on the last element wraps to the first
    /// - Focus outside the set is pulled back to the boundary
    /// - Anything else is left to the host
    ///
    /// ## Example
    /// ```rust
    /// use tiendas_core::a11y::{FocusTrap, TabOutcome};
    ///
    /// let trap = FocusTrap::activate(["close", "ok", "cancel"], || {});
    /// assert_eq!(trap.on_tab(Some(&"cancel"), false), TabOutcome::Wrap("close"));
    /// assert_eq!(trap.on_tab(Some(&"close"), true), TabOutcome::Wrap("cancel"));
    /// assert_eq!(trap.on_tab(Some(&"ok"), false), TabOutcome::Default);
    /// ```
    pub fn on_tab(&self, current: Option<&F>, shift: bool) -> TabOutcome<F> {
        let (Some(first), Some(last)) = (self.focusables.first(), self.focusables.last()) else {
            return TabOutcome::Default;
        };

        let inside = current.is_some_and(|c| self.focusables.contains(c));
        if !inside {
            let target = if shift { last } else { first };
            return TabOutcome::Wrap(target.clone());
        }

        match current {
            Some(c) if shift && c == first => TabOutcome::Wrap(last.clone()),
            Some(c) if !shift && c == last => TabOutcome::Wrap(first.clone()),
            _ => TabOutcome::Default,
        }
    }

    /// Tears the trap down now.
    pub fn release(mut self) {
        self.run_release();
    }
}

impl<F> FocusTrap<F> {
    fn run_release(&mut self) {
        if let Some(release) = self.on_release.take() {
            release();
        }
    }
}

impl<F> Drop for FocusTrap<F> {
    fn drop(&mut self) {
        self.run_release();
    }
}

impl<F: fmt::Debug> fmt::Debug for FocusTrap<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusTrap")
            .field("focusables", &self.focusables)
            .field("armed", &self.on_release.is_some())
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
