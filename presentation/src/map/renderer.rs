//! Console map renderer
//!
//! Implements the [`MapQueryListener`] port: each map action updates the
//! [`MapScene`] and prints a one-line summary with a link. Without a usable
//! map key the renderer stays disabled and every action is a no-op.

use super::scene::MapScene;
use colored::Colorize;
use mapchat_application::MapQueryListener;
use mapchat_domain::MapAction;
use std::io::{self, Stdout, Write};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Map renderer writing scene updates to a terminal
pub struct MapRenderer<W: Write + Send = Stdout> {
    enabled: bool,
    scene: Mutex<MapScene>,
    out: Mutex<W>,
}

impl MapRenderer<Stdout> {
    /// Create a renderer printing to stdout.
    ///
    /// `api_key` is the already-validated map key; `None` disables rendering.
    pub fn new(api_key: Option<&str>) -> Self {
        Self::with_writer(api_key, io::stdout())
    }
}

impl<W: Write + Send> MapRenderer<W> {
    pub fn with_writer(api_key: Option<&str>, out: W) -> Self {
        Self {
            enabled: api_key.is_some(),
            scene: Mutex::new(MapScene::new()),
            out: Mutex::new(out),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Startup banner shown when the map is disabled.
    pub fn banner(&self) -> Option<String> {
        (!self.enabled).then(|| {
            "Map unavailable: no Google Maps API key configured (set maps.api_key or \
             MAPCHAT_MAPS__API_KEY). Chat still works; map updates are skipped."
                .to_string()
        })
    }

    /// Snapshot of the current scene.
    pub fn scene(&self) -> MapScene {
        match self.scene.lock() {
            Ok(scene) => scene.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn render(&self, scene: &MapScene) -> io::Result<()> {
        let Ok(mut out) = self.out.lock() else {
            return Ok(());
        };
        let link = scene
            .link()
            .map(|url| url.to_string())
            .unwrap_or_default();
        writeln!(
            out,
            "{} {} {}",
            "[map]".green().bold(),
            scene.describe(),
            link.dimmed()
        )?;
        out.flush()
    }

    #[cfg(test)]
    fn into_writer(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> MapQueryListener for MapRenderer<W> {
    fn on_map_query(&self, action: MapAction) {
        if !self.enabled {
            debug!(%action, "Map disabled, skipping action");
            return;
        }

        let scene = {
            let Ok(mut scene) = self.scene.lock() else {
                warn!(%action, "Map scene unavailable");
                return;
            };
            scene.apply(&action);
            scene.clone()
        };

        debug!(%action, revision = scene.revision, "Map updated");
        if let Err(e) = self.render(&scene) {
            warn!(error = %e, "Failed to print map update");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::scene::Camera;

    #[test]
    fn test_enabled_renderer_applies_actions_in_order() {
        let renderer = MapRenderer::with_writer(Some("AIzaKey"), Vec::new());
        assert!(renderer.banner().is_none());

        renderer.on_map_query(MapAction::view_location("San Francisco"));
        renderer.on_map_query(MapAction::directions("Oakland", "Berkeley"));

        let scene = renderer.scene();
        assert_eq!(scene.revision, 2);
        assert_eq!(
            scene.camera,
            Camera::Route {
                origin: "Oakland".to_string(),
                destination: "Berkeley".to_string()
            }
        );

        let printed = String::from_utf8(renderer.into_writer()).unwrap();
        let lines: Vec<&str> = printed.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Showing San Francisco"));
        assert!(lines[0].contains("query=San+Francisco"));
        assert!(lines[1].contains("Route from Oakland to Berkeley"));
    }

    #[test]
    fn test_disabled_renderer_is_a_no_op() {
        let renderer = MapRenderer::with_writer(None, Vec::new());
        assert!(!renderer.is_enabled());
        assert!(renderer.banner().unwrap().contains("maps.api_key"));

        renderer.on_map_query(MapAction::view_location("Kyoto"));

        assert_eq!(renderer.scene(), MapScene::new());
        assert!(renderer.into_writer().is_empty());
    }
}
