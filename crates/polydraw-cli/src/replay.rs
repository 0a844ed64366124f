//! Drive an [`Editor`] over raster surfaces from a [`Script`].

use crate::script::{Script, Step, parse_color};
use anyhow::{Context, anyhow};
use polydraw_core::{Editor, InputEvent, Key, Modifiers, PointerEvent, RasterImage};
use polydraw_render::{FontBook, SkiaSurface, decode_png};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where text glyphs come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FontChoice {
    /// No font: text is measured approximately and not drawn.
    #[default]
    None,
    File(PathBuf),
    System,
}

impl FontChoice {
    fn load(&self) -> anyhow::Result<FontBook> {
        Ok(match self {
            FontChoice::None => FontBook::None,
            FontChoice::File(path) => FontBook::from_file(path)?,
            FontChoice::System => FontBook::system(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    pub fonts: FontChoice,
    /// Composite the preview surface over the result.
    pub overlay: bool,
    /// Directory that relative image paths in the script resolve against.
    pub base_dir: PathBuf,
}

impl ReplayOptions {
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    fn load_png(&self, path: &Path) -> anyhow::Result<RasterImage> {
        let path = self.resolve(path);
        let bytes = std::fs::read(&path).with_context(|| format!("cannot read {}", path.display()))?;
        decode_png(&bytes).with_context(|| format!("cannot decode {}", path.display()))
    }
}

/// Replay `script` and return the finished drawing.
pub fn replay(script: &Script, options: &ReplayOptions) -> anyhow::Result<SkiaSurface> {
    let config = script.editor_config();
    let (width, height, background) = (config.canvas_width, config.canvas_height, config.background);
    let base = SkiaSurface::new(width, height, background)?.with_fonts(options.fonts.load()?);
    let preview = SkiaSurface::new(width, height, background)?.with_fonts(options.fonts.load()?);
    let mut editor = Editor::new(config, base, preview);

    if let Some(path) = &script.image {
        editor.load_image(options.load_png(path)?);
    }
    if let Some(path) = &script.stamp {
        editor.set_stamp_image(Some(options.load_png(path)?));
    }

    for (index, step) in script.steps.iter().enumerate() {
        apply(&mut editor, step).with_context(|| format!("step {} ({step:?}) failed", index + 1))?;
    }
    log::info!(
        "Replayed {} steps, {} commands in history",
        script.steps.len(),
        editor.history().undo_len()
    );

    let grid = editor.grid().clone();
    let (mut base, preview) = editor.into_surfaces();
    if options.overlay {
        base.composite(&preview);
    }
    grid.draw(&mut base);
    Ok(base)
}

fn key_event(key: Key, pressed: bool) -> InputEvent {
    InputEvent::Key {
        key,
        pressed,
        modifiers: Modifiers::NONE,
    }
}

/// Apply one step to the editor.
pub fn apply(editor: &mut Editor<SkiaSurface>, step: &Step) -> anyhow::Result<()> {
    match step {
        Step::Tool { tool } => editor.set_tool(*tool),
        Step::Down(p) => editor.dispatch(InputEvent::PointerDown(p.event())),
        Step::Move(p) => editor.dispatch(InputEvent::PointerMove(p.event())),
        Step::Up(p) => editor.dispatch(InputEvent::PointerUp(p.event())),
        Step::Leave(p) => editor.dispatch(InputEvent::PointerLeave(p.event())),
        Step::Wheel { x, y, delta, alt } => {
            let event = PointerEvent::new((*x, *y).into()).with_modifiers(Modifiers {
                alt: *alt,
                ..Modifiers::NONE
            });
            editor.dispatch(InputEvent::Wheel { event, delta: *delta });
        }
        Step::Key { key, pressed } => {
            let key = Key::from_name(key).ok_or_else(|| anyhow!("unknown key '{key}'"))?;
            editor.dispatch(key_event(key, *pressed));
        }
        Step::Type { text } => {
            for c in text.chars() {
                let key = if c == '\n' { Key::Enter } else { Key::Character(c) };
                editor.dispatch(key_event(key, true));
                editor.dispatch(key_event(key, false));
            }
        }
        Step::Tick { ms } => editor.tick(Duration::from_millis(*ms)),
        Step::Undo => {
            if !editor.undo() {
                log::warn!("Undo ignored: nothing to undo");
            }
        }
        Step::Redo => {
            if !editor.redo() {
                log::warn!("Redo ignored: nothing to redo");
            }
        }
        Step::Color { primary, secondary } => {
            let parse = |s: &str| parse_color(s).ok_or_else(|| anyhow!("invalid color '{s}'"));
            if let Some(color) = primary {
                let color = parse(color)?;
                editor.palette_mut().set_primary(color);
            }
            if let Some(color) = secondary {
                let color = parse(color)?;
                editor.palette_mut().set_secondary(color);
            }
        }
        Step::Width { value } => {
            let settings = editor.tool_settings_mut();
            settings.line_width = *value;
            *settings = settings.clone().normalized();
        }
        Step::Fill { mode } => editor.tool_settings_mut().fill = *mode,
        Step::Sides { value } => editor.tool_settings_mut().set_polygon_sides(*value)?,
        Step::Grid {
            visible,
            cell_size,
            opacity,
        } => {
            let grid = editor.grid_mut();
            if let Some(visible) = visible {
                grid.visible = *visible;
            }
            if let Some(cell_size) = cell_size {
                grid.set_cell_size(*cell_size);
            }
            if let Some(opacity) = opacity {
                grid.set_opacity(*opacity);
            }
        }
        Step::Magnetism { enabled, anchor } => {
            if let Some(anchor) = anchor {
                editor.magnetism_mut().set_reference(*anchor);
            }
            let wanted = match (enabled, anchor) {
                (Some(enabled), _) => *enabled,
                (None, Some(_)) => editor.magnetism().is_enabled(),
                (None, None) => !editor.magnetism().is_enabled(),
            };
            if wanted != editor.magnetism().is_enabled() {
                editor.toggle_magnetism();
            }
        }
        Step::New { width, height } => editor.new_drawing(*width, *height),
    }
    Ok(())
}
