//! Container session: store + navigator + player wiring.
//!
//! The container descriptor yields the manifest. Each animation is then
//! fetched through `SourceDescriptor::Animation` and loaded with the settings
//! its manifest entry resolves to. Sources without a manifest are treated as a
//! single animation.

use crate::error::PlaybackError;
use crate::navigator::ManifestNavigator;
use crate::player::Player;
use crate::renderer::{ContainerStore, Renderer, SourceDescriptor};
use crate::settings::AnimationSettings;

#[derive(Debug)]
pub struct ContainerSession<S: ContainerStore> {
    store: S,
    source: SourceDescriptor,
    navigator: Option<ManifestNavigator>,
}

impl<S: ContainerStore> ContainerSession<S> {
    pub fn new(store: S, source: SourceDescriptor) -> Self {
        Self {
            store,
            source,
            navigator: None,
        }
    }

    /// Resolve the container and load its initial animation into `player`.
    pub fn open<R: Renderer>(&mut self, player: &mut Player<R>) -> crate::Result<()> {
        let resolved = self
            .store
            .resolve(&self.source)
            .map_err(|err| player.fail_fetch(err))?;

        match resolved.manifest {
            Some(manifest) => {
                manifest.validate()?;
                let base = AnimationSettings::from_config(player.config());
                let navigator = ManifestNavigator::new(manifest, base)?;
                log::debug!(
                    "opened container {} with {} animations, initial '{}'",
                    self.source.display_name(),
                    navigator.len(),
                    navigator.current_id()
                );
                self.navigator = Some(navigator);
                self.load_current(player)
            }
            None => {
                self.navigator = None;
                let settings = player.settings().clone();
                player.load_with_settings(&resolved.bytes, settings)
            }
        }
    }

    /// Advance to the next animation (clamped at the last) and reload it.
    /// Returns the active id.
    pub fn next<R: Renderer>(&mut self, player: &mut Player<R>) -> crate::Result<String> {
        self.step(player, |nav| {
            nav.next();
        })
    }

    /// Go back to the previous animation (clamped at the first) and reload it.
    pub fn previous<R: Renderer>(&mut self, player: &mut Player<R>) -> crate::Result<String> {
        self.step(player, |nav| {
            nav.previous();
        })
    }

    /// Switch to animation `id` and reload.
    pub fn activate<R: Renderer>(&mut self, id: &str, player: &mut Player<R>) -> crate::Result<()> {
        self.navigator_mut()?.set_active(id)?;
        self.load_current(player)
    }

    /// Pointer entered the view: hover animations start playing.
    pub fn pointer_entered<R: Renderer>(&self, player: &mut Player<R>) {
        if self.hover_enabled() {
            player.play();
        }
    }

    /// Pointer left the view: hover animations stop and rewind.
    pub fn pointer_exited<R: Renderer>(&self, player: &mut Player<R>) {
        if self.hover_enabled() {
            player.stop();
        }
    }

    pub fn hover_enabled(&self) -> bool {
        self.navigator
            .as_ref()
            .is_some_and(|nav| nav.current_entry().hover())
    }

    #[inline]
    pub fn navigator(&self) -> Option<&ManifestNavigator> {
        self.navigator.as_ref()
    }

    #[inline]
    pub fn active_id(&self) -> Option<&str> {
        self.navigator.as_ref().map(ManifestNavigator::current_id)
    }

    #[inline]
    pub fn source(&self) -> &SourceDescriptor {
        &self.source
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn step<R, F>(&mut self, player: &mut Player<R>, mv: F) -> crate::Result<String>
    where
        R: Renderer,
        F: FnOnce(&mut ManifestNavigator),
    {
        let nav = self.navigator_mut()?;
        let before = nav.current_index();
        mv(nav);
        let moved = nav.current_index() != before;
        let id = nav.current_id().to_string();
        if moved {
            self.load_current(player)?;
        } else {
            log::debug!("navigation clamped at '{id}'");
        }
        Ok(id)
    }

    fn load_current<R: Renderer>(&mut self, player: &mut Player<R>) -> crate::Result<()> {
        let nav = self
            .navigator
            .as_ref()
            .ok_or_else(|| self.no_manifest())?;
        let id = nav.current_id();
        let settings = nav.current_settings();
        let resolved = self
            .store
            .resolve(&self.source.animation(id))
            .map_err(|err| player.fail_fetch(err))?;
        player.load_with_settings(&resolved.bytes, settings)
    }

    fn navigator_mut(&mut self) -> crate::Result<&mut ManifestNavigator> {
        let missing = self.no_manifest();
        self.navigator.as_mut().ok_or(missing)
    }

    fn no_manifest(&self) -> PlaybackError {
        PlaybackError::MissingAnimation {
            id: self.source.display_name(),
        }
    }
}
