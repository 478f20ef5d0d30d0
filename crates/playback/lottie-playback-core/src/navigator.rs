//! Navigation over the animations of one container.
//!
//! `next`/`previous` saturate at the ends of the manifest; they never wrap.

use hashbrown::HashMap;

use crate::error::PlaybackError;
use crate::manifest::{Manifest, ManifestEntry};
use crate::settings::AnimationSettings;

/// Id of the animation a container opens on: the manifest's active id when it
/// names an existing entry, else the first entry.
pub fn resolve_initial_animation(manifest: &Manifest) -> crate::Result<String> {
    if let Some(active) = manifest.active_animation_id.as_deref() {
        if manifest.entry(active).is_some() {
            return Ok(active.to_string());
        }
        log::warn!("activeAnimationId '{active}' not in manifest, using first entry");
    }
    manifest
        .animations
        .first()
        .map(|e| e.id.clone())
        .ok_or_else(|| PlaybackError::MissingAnimation {
            id: manifest.active_animation_id.clone().unwrap_or_default(),
        })
}

/// Cursor over an immutable manifest.
#[derive(Clone, Debug)]
pub struct ManifestNavigator {
    manifest: Manifest,
    index: HashMap<String, usize>,
    current: usize,
    base: AnimationSettings,
}

impl ManifestNavigator {
    /// Build a navigator positioned on the initial animation. `base` supplies
    /// every setting an entry does not override.
    pub fn new(manifest: Manifest, base: AnimationSettings) -> crate::Result<Self> {
        let initial = resolve_initial_animation(&manifest)?;
        let index: HashMap<String, usize> = manifest
            .animations
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), i))
            .collect();
        let current = index.get(&initial).copied().unwrap_or(0);
        Ok(Self {
            manifest,
            index,
            current,
            base,
        })
    }

    /// Resolved settings for animation `id`.
    pub fn get_settings(&self, id: &str) -> crate::Result<AnimationSettings> {
        let entry = self.entry(id)?;
        Ok(entry.apply_to(&self.base))
    }

    /// Move to the following entry, staying on the last one.
    pub fn next(&mut self) -> &str {
        self.current = (self.current + 1).min(self.manifest.animations.len() - 1);
        self.current_id()
    }

    /// Move to the preceding entry, staying on the first one.
    pub fn previous(&mut self) -> &str {
        self.current = self.current.saturating_sub(1);
        self.current_id()
    }

    /// Point at `id`. Playback is untouched; the caller reloads.
    pub fn set_active(&mut self, id: &str) -> crate::Result<()> {
        let pos = self.position(id)?;
        self.current = pos;
        Ok(())
    }

    #[inline]
    pub fn current_id(&self) -> &str {
        &self.manifest.animations[self.current].id
    }

    #[inline]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[inline]
    pub fn current_entry(&self) -> &ManifestEntry {
        &self.manifest.animations[self.current]
    }

    /// Settings for the entry under the cursor.
    pub fn current_settings(&self) -> AnimationSettings {
        self.current_entry().apply_to(&self.base)
    }

    #[inline]
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.manifest.animations
    }

    #[inline]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.manifest.animations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.manifest.animations.is_empty()
    }

    fn position(&self, id: &str) -> crate::Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| PlaybackError::MissingAnimation { id: id.to_string() })
    }

    fn entry(&self, id: &str) -> crate::Result<&ManifestEntry> {
        let pos = self.position(id)?;
        Ok(&self.manifest.animations[pos])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Manifest {
        Manifest::new(vec![
            ManifestEntry::new("A"),
            ManifestEntry::new("B"),
            ManifestEntry::new("C"),
        ])
    }

    #[test]
    fn invalid_active_id_falls_back_to_first() {
        let mut m = abc();
        m.active_animation_id = Some("Z".into());
        assert_eq!(resolve_initial_animation(&m).unwrap(), "A");
        m.active_animation_id = Some("C".into());
        assert_eq!(resolve_initial_animation(&m).unwrap(), "C");
    }

    #[test]
    fn empty_manifest_is_missing_animation() {
        let err = resolve_initial_animation(&Manifest::default()).unwrap_err();
        assert!(matches!(err, PlaybackError::MissingAnimation { .. }));
        assert!(ManifestNavigator::new(Manifest::default(), AnimationSettings::default()).is_err());
    }

    #[test]
    fn set_active_validates_id() {
        let mut nav = ManifestNavigator::new(abc(), AnimationSettings::default()).unwrap();
        nav.set_active("C").unwrap();
        assert_eq!(nav.current_index(), 2);
        let err = nav.set_active("nope").unwrap_err();
        assert_eq!(err, PlaybackError::MissingAnimation { id: "nope".into() });
        assert_eq!(nav.current_id(), "C");
    }

    #[test]
    fn single_entry_saturates_both_ways() {
        let mut nav = ManifestNavigator::new(
            Manifest::new(vec![ManifestEntry::new("only")]),
            AnimationSettings::default(),
        )
        .unwrap();
        assert_eq!(nav.next(), "only");
        assert_eq!(nav.previous(), "only");
    }
}
