use anyhow::{anyhow, Context, Result};

use crate::core::{DisplayMode, Settings};

use super::backend::{HostEvents, PlatformBackend};

/// Display-mode selection over a set of platform backends.
pub struct PlatformLayer {
    flatscreen: Box<dyn PlatformBackend>,
    mixed_reality: Option<Box<dyn PlatformBackend>>,
    active: Option<DisplayMode>,
}

impl PlatformLayer {
    pub fn new(
        flatscreen: Box<dyn PlatformBackend>,
        mixed_reality: Option<Box<dyn PlatformBackend>>,
    ) -> Self {
        Self {
            flatscreen,
            mixed_reality,
            active: None,
        }
    }

    /// Mode of the backend that started, if any.
    pub fn active(&self) -> Option<DisplayMode> {
        self.active
    }

    /// Starts the preferred display mode, falling back to flatscreen when
    /// the settings allow it.
    pub fn init(&mut self, settings: &Settings) -> Result<DisplayMode> {
        let preferred = settings.display_preference;

        let err = match self.start(preferred, settings) {
            Ok(()) => return Ok(preferred),
            Err(err) => err,
        };
        log::warn!("Couldn't create {preferred} mode: {err:#}");

        if !settings.display_fallback || preferred == DisplayMode::Flatscreen {
            return Err(err);
        }

        log::info!("falling back to flatscreen");
        self.start(DisplayMode::Flatscreen, settings)
            .context("flatscreen fallback failed")?;
        Ok(DisplayMode::Flatscreen)
    }

    pub fn shutdown(&mut self) {
        if let Some(mode) = self.active.take() {
            if let Some(backend) = self.backend_mut(mode) {
                log::debug!("stopping {} platform", backend.name());
                backend.shutdown();
            }
        }
    }

    pub fn step_begin(&mut self) -> HostEvents {
        match self.active_backend() {
            Some(backend) => backend.step_begin(),
            None => HostEvents::default(),
        }
    }

    pub fn step_end(&mut self) {
        if let Some(backend) = self.active_backend() {
            backend.step_end();
        }
    }

    pub fn present(&mut self) {
        if let Some(backend) = self.active_backend() {
            backend.present();
        }
    }

    fn start(&mut self, mode: DisplayMode, settings: &Settings) -> Result<()> {
        let backend = self
            .backend_mut(mode)
            .ok_or_else(|| anyhow!("no {mode} backend available"))?;

        backend
            .init(&settings.app_name, &settings.window)
            .with_context(|| format!("{} backend failed to start", backend.name()))?;

        log::info!("platform started in {mode} mode ({})", backend.name());
        self.active = Some(mode);
        Ok(())
    }

    fn active_backend(&mut self) -> Option<&mut (dyn PlatformBackend + 'static)> {
        let mode = self.active?;
        self.backend_mut(mode)
    }

    fn backend_mut(&mut self, mode: DisplayMode) -> Option<&mut (dyn PlatformBackend + 'static)> {
        match mode {
            DisplayMode::Flatscreen => Some(self.flatscreen.as_mut()),
            DisplayMode::MixedReality => self.mixed_reality.as_deref_mut(),
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::bail;

    use super::*;
    use crate::core::WindowRect;
    use crate::platform::HeadlessBackend;

    struct NoHeadset;

    impl PlatformBackend for NoHeadset {
        fn name(&self) -> &str {
            "no-headset"
        }

        fn init(&mut self, _app_name: &str, _window: &WindowRect) -> Result<()> {
            bail!("no XR runtime installed")
        }

        fn shutdown(&mut self) {}

        fn step_begin(&mut self) -> HostEvents {
            HostEvents::default()
        }

        fn step_end(&mut self) {}
    }

    fn settings(preference: DisplayMode, fallback: bool) -> Settings {
        Settings {
            display_preference: preference,
            display_fallback: fallback,
            ..Settings::default()
        }
    }

    fn layer() -> PlatformLayer {
        PlatformLayer::new(Box::new(HeadlessBackend::new()), Some(Box::new(NoHeadset)))
    }

    #[test]
    fn flatscreen_preference_starts_directly() {
        let mut layer = layer();
        let mode = layer.init(&settings(DisplayMode::Flatscreen, false)).unwrap();
        assert_eq!(mode, DisplayMode::Flatscreen);
        assert_eq!(layer.active(), Some(DisplayMode::Flatscreen));
    }

    #[test]
    fn mixed_reality_failure_falls_back() {
        let mut layer = layer();
        let mode = layer.init(&settings(DisplayMode::MixedReality, true)).unwrap();
        assert_eq!(mode, DisplayMode::Flatscreen);
    }

    #[test]
    fn mixed_reality_failure_without_fallback_errors() {
        let mut layer = layer();
        let err = layer
            .init(&settings(DisplayMode::MixedReality, false))
            .unwrap_err();
        assert!(format!("{err:#}").contains("no XR runtime installed"));
        assert_eq!(layer.active(), None);
    }

    #[test]
    fn missing_backend_is_an_error() {
        let mut layer = PlatformLayer::new(Box::new(HeadlessBackend::new()), None);
        let err = layer
            .init(&settings(DisplayMode::MixedReality, false))
            .unwrap_err();
        assert!(err.to_string().contains("no MixedReality backend"));
    }

    #[test]
    fn shutdown_clears_active_mode() {
        let mut layer = layer();
        layer.init(&settings(DisplayMode::Flatscreen, false)).unwrap();
        layer.shutdown();
        assert_eq!(layer.active(), None);
        assert!(layer.step_begin().focused);
    }
}
