//! Rotation toolbar, the built-in overlay module.
//!
//! Renders a rotate-left and a rotate-right button at the bottom of the
//! overlay. Each click turns the active image a quarter turn, persists the
//! new angle on the image and asks the controller to re-place the overlay.
//!
//! The toolbar lives inside the overlay, so it has nothing to do on update
//! and nothing to tear down: its elements and their listeners go away with
//! the overlay.

use std::marker::PhantomData;

use crate::error::Result;
use crate::host::{Host, Listener};
use crate::module::{Module, ModuleContext, Outcome};
use crate::rotation::{Direction, Rotation, ROTATION_ATTRIBUTE};
use crate::style::StyleMap;

/// Registry name of the rotation toolbar.
pub const TOOLBAR_MODULE: &str = "Toolbar";

/// Filter marking the selected button.
const SELECTED_FILTER: &str = "invert(20%)";

const ICON_ROTATE_LEFT: &str = r#"<svg viewbox="0 0 18 18"><polygon class="ql-fill ql-stroke" points="6 10 4 12 2 10 6 10"></polygon><path class="ql-stroke" d="M8.09,13.91A4.6,4.6,0,0,0,9,14,5,5,0,1,0,4,9"></path></svg>"#;

const ICON_ROTATE_RIGHT: &str = r#"<svg viewbox="0 0 18 18"><polygon class="ql-fill ql-stroke" points="12 10 14 12 16 10 12 10"></polygon><path class="ql-stroke" d="M9.91,13.91A4.6,4.6,0,0,1,9,14a5,5,0,1,1,5-5"></path></svg>"#;

/// A toolbar command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Command {
    name: &'static str,
    icon: &'static str,
    direction: Direction,
}

impl Command {
    /// Rotations always advance, so no command is ever "on".
    fn is_applied(&self) -> bool {
        false
    }
}

const COMMANDS: [Command; 2] = [
    Command {
        name: "rotate-left",
        icon: ICON_ROTATE_LEFT,
        direction: Direction::Left,
    },
    Command {
        name: "rotate-right",
        icon: ICON_ROTATE_RIGHT,
        direction: Direction::Right,
    },
];

/// Quarter-turn rotation toolbar.
pub struct RotationToolbar<H: Host> {
    rotation: Rotation,
    buttons: Vec<(H::Node, Command)>,
    _host: PhantomData<fn() -> H>,
}

impl<H: Host> RotationToolbar<H> {
    pub fn new() -> Self {
        Self {
            rotation: Rotation::default(),
            buttons: Vec::new(),
            _host: PhantomData,
        }
    }

    /// Factory for the module registry.
    pub fn boxed() -> Box<dyn Module<H>> {
        Box::new(Self::new())
    }

    /// Current rotation of the active image.
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    fn add_buttons(&mut self, ctx: &mut ModuleContext<'_, H>, toolbar: &H::Node) -> Result<()> {
        for (idx, command) in COMMANDS.iter().enumerate() {
            let button = ctx.host.create_element("span")?;
            ctx.host.set_inner_html(&button, command.icon);
            ctx.host.listen(&Listener::element_click(button.clone()))?;

            apply_styles(ctx.host, &button, &ctx.options.toolbar_button_styles)?;
            if idx > 0 {
                ctx.host.set_style(&button, "border-left-width", "0")?;
            }
            if let Some(icon) = ctx.host.first_element_child(&button) {
                apply_styles(ctx.host, &icon, &ctx.options.toolbar_button_svg_styles)?;
            }
            if command.is_applied() {
                select_button(ctx.host, &button)?;
            }

            ctx.host.append_child(toolbar, &button)?;
            self.buttons.push((button, *command));
        }
        Ok(())
    }

    fn apply(&mut self, ctx: &mut ModuleContext<'_, H>, command: &Command) -> Result<()> {
        self.rotation = self.rotation.rotate(command.direction);
        log::debug!("{}: image now at {}", command.name, self.rotation);

        ctx.host
            .set_attribute(ctx.image, ROTATION_ATTRIBUTE, &self.rotation.to_attribute())?;
        ctx.host
            .set_style(ctx.image, "transform", &self.rotation.css_transform())
    }
}

impl<H: Host> Default for RotationToolbar<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Host> Module<H> for RotationToolbar<H> {
    fn on_create(&mut self, ctx: &mut ModuleContext<'_, H>) -> Result<()> {
        let toolbar = ctx.host.create_element("div")?;
        apply_styles(ctx.host, &toolbar, &ctx.options.toolbar_styles)?;
        ctx.host.append_child(ctx.overlay, &toolbar)?;

        self.add_buttons(ctx, &toolbar)?;
        self.rotation =
            Rotation::from_attribute(ctx.host.attribute(ctx.image, ROTATION_ATTRIBUTE).as_deref());
        Ok(())
    }

    fn on_update(&mut self, _ctx: &mut ModuleContext<'_, H>) -> Result<()> {
        Ok(())
    }

    fn on_destroy(&mut self, _ctx: &mut ModuleContext<'_, H>) -> Result<()> {
        Ok(())
    }

    fn on_click(&mut self, ctx: &mut ModuleContext<'_, H>, target: &H::Node) -> Result<Outcome> {
        let Some(command) = self
            .buttons
            .iter()
            .find(|(button, _)| button == target)
            .map(|(_, command)| *command)
        else {
            return Ok(Outcome::Ignored);
        };

        for (button, _) in &self.buttons {
            ctx.host.remove_style(button, "filter")?;
        }

        if command.is_applied() {
            ctx.host.remove_style(ctx.image, "transform")?;
        } else {
            select_button(ctx.host, target)?;
            self.apply(ctx, &command)?;
        }

        Ok(Outcome::RequestUpdate)
    }
}

fn select_button<H: Host>(host: &mut H, button: &H::Node) -> Result<()> {
    host.set_style(button, "filter", SELECTED_FILTER)
}

pub(crate) fn apply_styles<H: Host>(host: &mut H, node: &H::Node, styles: &StyleMap) -> Result<()> {
    for (property, value) in styles.iter() {
        host.set_style(node, property, value)?;
    }
    Ok(())
}
