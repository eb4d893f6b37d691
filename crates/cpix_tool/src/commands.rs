use std::path::Path;

use anyhow::{Context, bail};
use cpix_engine::{CharRef, Color, Document, DocumentProperties, LayerId, LayerUpdate, PatchCell};
use cpix_engine_edit::{Applied, EditState, EditorOptions, Operation};

use crate::Command;

pub fn run(command: Command, options: EditorOptions) -> anyhow::Result<()> {
    match command {
        Command::New {
            file,
            name,
            hblocks,
            vblocks,
            ppb,
            resolution,
            cpc,
        } => {
            let mut state = EditState::new(options);
            state.apply(Operation::CreateDocument {
                properties: DocumentProperties { name, hblocks, vblocks, ppb },
            })?;
            state.apply(Operation::CreateLayer {
                properties: LayerUpdate {
                    resolution,
                    cpc,
                    ..Default::default()
                },
            })?;
            state.save(&file)?;
            log::info!("created {}", file.display());
        }
        Command::Info { file } => {
            let state = open(&file, options)?;
            print_info(state.document());
        }
        Command::AddLayer { file, title, resolution, cpc } => {
            let mut state = open(&file, options)?;
            let properties = LayerUpdate {
                title,
                resolution,
                cpc,
                ..Default::default()
            };
            state.apply(Operation::CreateLayer { properties })?;
            if let Some(id) = state.current_layer() {
                println!("{}", id.0);
            }
            state.save(&file)?;
        }
        Command::Paint {
            file,
            layer,
            x,
            y,
            text,
            fg,
            bg,
            font,
        } => {
            let mut state = open(&file, options)?;
            let layer = select_layer(&state, layer)?;
            let font = match font {
                Some(name) => state.add_font(&name)?.1,
                None => 0,
            };
            let fg = Color::from_hex(&fg)?;
            let bg = bg.as_deref().map(Color::from_hex).transpose()?;
            let cells: Vec<Vec<PatchCell>> = text
                .split("\\n")
                .map(|row| row.chars().map(|c| PatchCell::new(CharRef::from_char(font, c), fg, bg)).collect::<Vec<_>>())
                .collect();
            state.apply(Operation::Paint { layer, x, y, cells })?;
            save_if_dirty(&mut state, &file)?;
        }
        Command::Erase { file, layer, x0, y0, x1, y1 } => {
            let mut state = open(&file, options)?;
            let layer = select_layer(&state, layer)?;
            let applied = state.apply(Operation::Erase {
                layer,
                from: (x0, y0),
                to: (x1, y1),
            })?;
            if applied == Applied::Unchanged {
                log::info!("nothing to erase");
            }
            save_if_dirty(&mut state, &file)?;
        }
        Command::Dump { file, layer } => {
            let state = open(&file, options)?;
            let layer = select_layer(&state, layer)?;
            for line in dump_layer(state.document(), layer)? {
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn open(file: &Path, options: EditorOptions) -> anyhow::Result<EditState> {
    let mut state = EditState::new(options);
    state.load(file).with_context(|| format!("opening {}", file.display()))?;
    Ok(state)
}

fn select_layer(state: &EditState, layer: Option<u64>) -> anyhow::Result<LayerId> {
    match layer.map(LayerId).or(state.current_layer()) {
        Some(id) => {
            state.document().layer(id)?;
            Ok(id)
        }
        None => bail!("the project has no layers"),
    }
}

fn save_if_dirty(state: &mut EditState, file: &Path) -> anyhow::Result<()> {
    if state.is_dirty() {
        state.save(file)?;
        log::info!("saved {}", file.display());
    } else {
        log::info!("nothing changed");
    }
    Ok(())
}

fn print_info(doc: &Document) {
    let name = if doc.name.is_empty() { "(unnamed)" } else { doc.name.as_str() };
    println!("{name}: {}x{} blocks, {} pixels per block", doc.hblocks(), doc.vblocks(), doc.ppb());
    for (id, layer) in doc.layers_by_index() {
        let grid = layer.grid();
        let painted = grid.cells().filter(|(_, _, cpix)| cpix.is_visible()).count();
        println!(
            "  [{}] layer {} '{}': {}x{} cells (resolution {}, cpc {}){}, {painted} painted",
            layer.index,
            id.0,
            layer.title(),
            grid.width(),
            grid.height(),
            layer.resolution(),
            layer.cpc(),
            if layer.is_visible() { "" } else { ", hidden" }
        );
    }
    let chars = doc.char_palette();
    let colors = doc.color_palette();
    println!("chars: {}/{} slots", chars.len(), chars.capacity() - 1);
    println!("colors: {}/{} slots", colors.len(), colors.capacity() - 1);
    let fonts: Vec<_> = doc.fonts().iter().flatten().map(String::as_str).collect();
    if !fonts.is_empty() {
        println!("fonts: {}", fonts.join(", "));
    }
    if !doc.brushes().is_empty() {
        println!("brushes: {}", doc.brushes().len());
    }
}

/// Rows of a layer as text; cells without glyph are blanks.
fn dump_layer(doc: &Document, layer: LayerId) -> anyhow::Result<Vec<String>> {
    let grid = doc.layer(layer)?.grid();
    Ok(grid
        .rows()
        .map(|row| {
            let line: String = row
                .iter()
                .map(|cpix| doc.resolve(*cpix).glyph().and_then(|(ch, _)| ch.to_char()).unwrap_or(' '))
                .collect();
            line.trim_end().to_string()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_layer() {
        let doc = Document::create(&DocumentProperties::blocks(1, 1)).unwrap();
        let (doc, id) = doc.create_layer(&LayerUpdate::default()).unwrap();
        let cells = vec!["hi".chars().map(|c| PatchCell::new(CharRef::from_char(0, c), Color::WHITE, None)).collect::<Vec<_>>()];
        let doc = doc.paint(id, 1, 0, &cells).unwrap().unwrap();
        let lines = dump_layer(&doc, id).unwrap();
        assert_eq!(8, lines.len());
        assert_eq!(" hi", lines[0]);
        assert_eq!("", lines[1]);
    }
}
