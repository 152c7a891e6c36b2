//! Selection controller.
//!
//! Watches clicks on the editing surface, decides which image is active,
//! owns the overlay drawn over it and keeps the overlay's geometry in sync
//! with the image. Modules are created when an image becomes active and
//! destroyed when it stops being active.
//!
//! # Session invariants
//!
//! - An overlay exists if and only if an image is active; both live in the
//!   same [`Session`].
//! - Every listener added on activation is removed on deactivation with an
//!   identical [`Listener`] value.
//! - Activating a new image tears the previous session down completely
//!   (every module's `on_destroy`) before the new one is built.

use crate::error::Result;
use crate::geometry::{overlay_placement, recenter_margin};
use crate::host::{Host, HostEvent, Listener};
use crate::module::{Module, ModuleContext, ModuleFactory, ModuleRegistry, Outcome};
use crate::options::Options;
use crate::rotation::{Rotation, ROTATION_ATTRIBUTE};
use crate::toolbar::apply_styles;

/// One-shot marker for the refocus workaround.
pub const CLICK_COUNT_ATTRIBUTE: &str = "clickCount";

/// Properties that suppress text selection while an image is active.
const USER_SELECT_PROPERTIES: [&str; 4] = [
    "user-select",
    "-moz-user-select",
    "-webkit-user-select",
    "-ms-user-select",
];

/// State that exists only while an image is active.
struct Session<H: Host> {
    image: H::Node,
    overlay: H::Node,
    modules: Vec<Box<dyn Module<H>>>,
}

/// Lets a user select an image in the editor and rotate it.
pub struct ImageRotate<H: Host> {
    host: H,
    options: Options,
    modules: Vec<ModuleFactory<H>>,
    active: Option<Session<H>>,
    attached: bool,
}

impl<H: Host> ImageRotate<H> {
    /// Create a controller with already-resolved module factories.
    pub fn new(host: H, options: Options, modules: Vec<ModuleFactory<H>>) -> Self {
        Self {
            host,
            options,
            modules,
            active: None,
            attached: false,
        }
    }

    /// Create a controller, resolving `options.modules` in `registry`.
    ///
    /// Fails with [`RotateError::UnknownModule`](crate::RotateError::UnknownModule)
    /// if a configured module is not registered.
    pub fn with_registry(host: H, options: Options, registry: &ModuleRegistry<H>) -> Result<Self> {
        let modules = registry.resolve(&options.modules)?;
        Ok(Self::new(host, options, modules))
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// The active image, if any.
    pub fn active_image(&self) -> Option<&H::Node> {
        self.active.as_ref().map(|session| &session.image)
    }

    /// The overlay over the active image, if any.
    pub fn overlay(&self) -> Option<&H::Node> {
        self.active.as_ref().map(|session| &session.overlay)
    }

    /// Number of live module instances.
    pub fn module_count(&self) -> usize {
        self.active.as_ref().map_or(0, |session| session.modules.len())
    }

    /// Start listening for clicks on the editing surface.
    ///
    /// Gives the container `position: relative` unless it already has an
    /// explicit position. Calling `attach` twice is a no-op.
    pub fn attach(&mut self) -> Result<()> {
        if self.attached {
            return Ok(());
        }

        self.host.listen(&Listener::root_click())?;
        self.attached = true;

        let container = self.host.container();
        if self.host.style(&container, "position").is_empty() {
            self.host.set_style(&container, "position", "relative")?;
        }
        Ok(())
    }

    /// Deactivate and stop listening for surface clicks.
    pub fn detach(&mut self) -> Result<()> {
        let deactivated = self.deactivate();
        if self.attached {
            self.attached = false;
            self.host.unlisten(&Listener::root_click())?;
        }
        deactivated
    }

    /// React to a click on the editing surface.
    ///
    /// Clicking a new image activates it, clicking the active image does
    /// nothing, and clicking anything else deactivates.
    pub fn handle_click(&mut self, target: &H::Node) -> Result<()> {
        if !self.host.is_image(target) {
            return self.deactivate();
        }
        if self.active_image() == Some(target) {
            return Ok(());
        }
        if !self.host.is_connected(target) {
            // A delayed re-click can outlive its image
            log::debug!("ignoring click on detached image {:?}", target);
            return Ok(());
        }
        self.activate(target.clone())
    }

    /// Make `image` the active image.
    ///
    /// Any previously active image is deactivated first.
    pub fn activate(&mut self, image: H::Node) -> Result<()> {
        self.deactivate()?;
        log::debug!("activating image {:?}", image);

        self.host.clear_selection()?;
        self.set_user_select("none")?;
        self.host.listen(&Listener::document_keyup())?;
        self.host.listen(&Listener::root_input())?;

        let overlay = self.host.create_element("div");
        let overlay = match overlay {
            Ok(overlay) => overlay,
            Err(err) => {
                // Undo the listeners and user-select above
                self.host.unlisten(&Listener::document_keyup())?;
                self.host.unlisten(&Listener::root_input())?;
                self.set_user_select("")?;
                return Err(err);
            }
        };
        self.active = Some(Session {
            image: image.clone(),
            overlay: overlay.clone(),
            modules: Vec::new(),
        });

        apply_styles(&mut self.host, &overlay, &self.options.overlay_styles)?;
        let container = self.host.container();
        self.host.append_child(&container, &overlay)?;
        self.refresh_geometry()?;

        if self.options.refocus_workaround {
            self.refocus_once(&image)?;
        }

        if let Err(err) = self.create_modules() {
            // Only modules whose on_create ran are torn down
            if let Err(teardown) = self.deactivate() {
                log::warn!("teardown after failed module creation: {}", teardown);
            }
            return Err(err);
        }
        self.update()
    }

    /// Same as [`activate`](Self::activate).
    pub fn show(&mut self, image: H::Node) -> Result<()> {
        self.activate(image)
    }

    /// Tear down the active session. No-op if nothing is active.
    pub fn deactivate(&mut self) -> Result<()> {
        let Some(mut session) = self.active.take() else {
            return Ok(());
        };
        log::debug!("deactivating image {:?}", session.image);

        // Keep tearing down after a failure; report the first one
        let container = self.host.container();
        let mut result = self.host.unlisten(&Listener::document_keyup());
        result = result.and(self.host.unlisten(&Listener::root_input()));
        result = result.and(self.set_user_select(""));
        result = result.and(self.host.remove_child(&container, &session.overlay));

        let mut ctx = ModuleContext {
            host: &mut self.host,
            image: &session.image,
            overlay: &session.overlay,
            options: &self.options,
        };
        for module in session.modules.iter_mut() {
            result = result.and(module.on_destroy(&mut ctx));
        }
        result
    }

    /// Same as [`deactivate`](Self::deactivate).
    pub fn hide(&mut self) -> Result<()> {
        self.deactivate()
    }

    /// Refresh geometry, then let every module update.
    pub fn update(&mut self) -> Result<()> {
        self.refresh_geometry()?;

        let Some(session) = self.active.as_mut() else {
            return Ok(());
        };
        let mut ctx = ModuleContext {
            host: &mut self.host,
            image: &session.image,
            overlay: &session.overlay,
            options: &self.options,
        };
        for module in session.modules.iter_mut() {
            module.on_update(&mut ctx)?;
        }
        Ok(())
    }

    /// Recenter the active image and place the overlay over it.
    ///
    /// No-op if nothing is active. With no layout change in between, two
    /// calls write identical styles.
    pub fn refresh_geometry(&mut self) -> Result<()> {
        let Some(session) = self.active.as_ref() else {
            return Ok(());
        };
        let host = &mut self.host;
        let container = host.container();
        let container_rect = host.bounding_rect(&container);
        let intrinsic = host.intrinsic_size(&session.image);

        let rendered = host.bounding_rect(&session.image).size();
        let margin = recenter_margin(intrinsic, rendered);
        host.set_style(&session.image, "margin", &margin.to_css())?;

        let rotation =
            Rotation::from_attribute(host.attribute(&session.image, ROTATION_ATTRIBUTE).as_deref());
        // The margin moved the image; measure again
        let image_rect = host.bounding_rect(&session.image);
        let scroll = host.scroll_offset(&container);

        let placement = overlay_placement(rotation, intrinsic, image_rect, container_rect, scroll);
        apply_styles(host, &session.overlay, &placement.to_styles())
    }

    /// React to a key-up or input event while an image is active.
    ///
    /// Delete and Backspace remove the image from the document. Any such
    /// event ends the session.
    pub fn handle_key_or_input(&mut self, event: HostEvent) -> Result<()> {
        let Some(session) = self.active.as_ref() else {
            return Ok(());
        };

        let deleted = if event.is_delete_key() {
            let image = session.image.clone();
            log::debug!("deleting image {:?}", image);
            self.host.delete_embed(&image)
        } else {
            Ok(())
        };
        let deactivated = self.deactivate();
        deleted.and(deactivated)
    }

    /// Re-click `image` for the refocus workaround once its delay is up.
    ///
    /// Does nothing unless `image` is still the active image: the user may
    /// have selected something else, or deleted the image, in the meantime.
    pub fn handle_refocus_click(&mut self, image: &H::Node) {
        if self.active_image() != Some(image) {
            log::debug!("dropping stale refocus click on {:?}", image);
            return;
        }
        self.host.click(image);
    }

    /// Route a click on a module-owned control to the active modules.
    pub fn handle_control_click(&mut self, target: &H::Node) -> Result<()> {
        let Some(session) = self.active.as_mut() else {
            return Ok(());
        };
        let mut ctx = ModuleContext {
            host: &mut self.host,
            image: &session.image,
            overlay: &session.overlay,
            options: &self.options,
        };

        let mut needs_update = false;
        for module in session.modules.iter_mut() {
            match module.on_click(&mut ctx, target)? {
                Outcome::RequestUpdate => needs_update = true,
                Outcome::Handled | Outcome::Ignored => {}
            }
        }

        if needs_update {
            self.update()?;
        }
        Ok(())
    }

    fn create_modules(&mut self) -> Result<()> {
        let Some(session) = self.active.as_mut() else {
            return Ok(());
        };
        let mut ctx = ModuleContext {
            host: &mut self.host,
            image: &session.image,
            overlay: &session.overlay,
            options: &self.options,
        };
        for factory in &self.modules {
            let mut module = factory();
            module.on_create(&mut ctx)?;
            session.modules.push(module);
        }
        Ok(())
    }

    /// Work around the host editor's toolbar missing the first image focus:
    /// click the surface now and the image again after a delay. Runs once
    /// per image until its marker attribute is reset.
    fn refocus_once(&mut self, image: &H::Node) -> Result<()> {
        let clicks = self
            .host
            .attribute(image, CLICK_COUNT_ATTRIBUTE)
            .and_then(|count| count.trim().parse::<i64>().ok())
            .unwrap_or(0);
        if clicks >= 1 {
            return Ok(());
        }

        self.host.set_attribute(image, CLICK_COUNT_ATTRIBUTE, "1")?;
        let root = self.host.root();
        self.host.click(&root);
        self.host.refocus_later(image, self.options.refocus_delay);
        Ok(())
    }

    fn set_user_select(&mut self, value: &str) -> Result<()> {
        let root = self.host.root();
        let document = self.host.document_element();
        for property in USER_SELECT_PROPERTIES {
            for node in [&root, &document] {
                if value.is_empty() {
                    self.host.remove_style(node, property)?;
                } else {
                    self.host.set_style(node, property, value)?;
                }
            }
        }
        Ok(())
    }
}

impl<H: Host> Drop for ImageRotate<H> {
    fn drop(&mut self) {
        if let Err(err) = self.detach() {
            log::warn!("failed to detach image rotation: {}", err);
        }
    }
}
