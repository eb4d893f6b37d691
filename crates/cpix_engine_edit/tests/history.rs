use std::sync::Arc;

use cpix_engine_edit::{
    Applied, CharRef, Color, Cpix, DocumentProperties, EditState, EditorError, EditorOptions, EngineError, LayerUpdate, Operation, PaletteUpdate,
    PatchCell,
};
use pretty_assertions::assert_eq;

fn editor() -> EditState {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut state = EditState::default();
    state.create_document(&DocumentProperties::blocks(2, 2)).unwrap();
    state
}

fn glyph(c: char) -> Vec<Vec<PatchCell>> {
    vec![vec![PatchCell::new(CharRef::from_char(0, c), Color::WHITE, None)]]
}

#[test]
fn test_undo_restores_exact_snapshot() {
    let mut state = editor();
    let layer = state.create_layer(&LayerUpdate::default()).unwrap();
    let before = state.snapshot();

    assert_eq!(Applied::Changed, state.paint(layer, 1, 1, &glyph('a')).unwrap());
    let after = state.snapshot();

    assert_eq!(Applied::Changed, state.undo());
    assert!(Arc::ptr_eq(&before, &state.snapshot()));
    assert_eq!(Applied::Changed, state.redo());
    assert!(Arc::ptr_eq(&after, &state.snapshot()));
}

#[test]
fn test_undo_redo_on_empty_history() {
    let mut state = editor();
    assert_eq!(Applied::Unchanged, state.undo());
    assert_eq!(Applied::Unchanged, state.redo());
    assert_eq!(Applied::Unchanged, state.apply(Operation::Undo).unwrap());
}

#[test]
fn test_new_operation_clears_redo() {
    let mut state = editor();
    let layer = state.create_layer(&LayerUpdate::default()).unwrap();
    state.paint(layer, 0, 0, &glyph('a')).unwrap();
    state.undo();
    assert!(state.can_redo());
    state.paint(layer, 0, 0, &glyph('b')).unwrap();
    assert!(!state.can_redo());
    assert_eq!(2, state.undo_stack().undo_len());
}

#[test]
fn test_history_is_bounded() {
    let mut state = EditState::new(EditorOptions {
        history_limit: 3,
        ..Default::default()
    });
    state.create_document(&DocumentProperties::default()).unwrap();
    let layer = state.create_layer(&LayerUpdate::default()).unwrap();
    for x in 0..5 {
        state.paint(layer, x, 0, &glyph('a')).unwrap();
    }
    assert_eq!(3, state.undo_stack().undo_len());
    while state.can_undo() {
        state.undo();
    }
    // the two oldest paints survived eviction
    let doc = state.document();
    assert!(doc.cell(layer, 1, 0).unwrap().unwrap().has_glyph());
    assert!(doc.cell(layer, 2, 0).unwrap().unwrap().is_empty());

    // redo respects the bound as well
    while state.can_redo() {
        state.redo();
    }
    assert_eq!(3, state.undo_stack().undo_len());
}

#[test]
fn test_default_history_limit() {
    let mut state = editor();
    let layer = state.create_layer(&LayerUpdate::default()).unwrap();
    for i in 0..120 {
        state.paint(layer, i % 16, i / 16, &glyph('a')).unwrap();
    }
    assert_eq!(100, state.undo_stack().undo_len());
}

#[test]
fn test_rejected_operation_leaves_history() {
    let mut state = editor();
    let layer = state.create_layer(&LayerUpdate::default()).unwrap();
    let snapshot = state.snapshot();
    let undo_len = state.undo_stack().undo_len();

    let err = state
        .apply(Operation::UpdatePalette {
            update: PaletteUpdate::Color {
                index: Some(0),
                value: None,
            },
        })
        .unwrap_err();
    assert!(matches!(err, EditorError::Engine(EngineError::ProtectedSlot { .. })));
    let err = state.apply(Operation::DeleteLayer { layer: cpix_engine_edit::LayerId(99) }).unwrap_err();
    assert!(matches!(err, EditorError::Engine(EngineError::InvalidLayer { .. })));

    assert!(Arc::ptr_eq(&snapshot, &state.snapshot()));
    assert_eq!(undo_len, state.undo_stack().undo_len());
    assert!(state.document().layer(layer).is_ok());
}

#[test]
fn test_noop_operations_push_no_history() {
    let mut state = editor();
    let layer = state.create_layer(&LayerUpdate::default()).unwrap();
    let undo_len = state.undo_stack().undo_len();

    let clear_free_slot = Operation::UpdatePalette {
        update: PaletteUpdate::Char {
            index: Some(17),
            value: None,
        },
    };
    assert_eq!(Applied::Unchanged, state.apply(clear_free_slot).unwrap());
    assert_eq!(Applied::Unchanged, state.apply(Operation::MoveLayer { layer, index: 0 }).unwrap());
    assert_eq!(
        Applied::Unchanged,
        state
            .apply(Operation::Erase {
                layer,
                from: (0, 0),
                to: (3, 3)
            })
            .unwrap()
    );
    assert_eq!(undo_len, state.undo_stack().undo_len());
}

#[test]
fn test_create_and_load_reset_history() {
    let mut state = editor();
    let layer = state.create_layer(&LayerUpdate::default()).unwrap();
    state.paint(layer, 0, 0, &glyph('a')).unwrap();
    state.undo();
    assert!(state.can_undo() && state.can_redo());

    let document = state.document().clone();
    state.apply(Operation::LoadDocument { document: Box::new(document) }).unwrap();
    assert!(!state.can_undo());
    assert!(!state.can_redo());
    assert_eq!(Some(layer), state.current_layer());

    state.paint(layer, 0, 0, &glyph('b')).unwrap();
    state
        .apply(Operation::CreateDocument {
            properties: DocumentProperties::default(),
        })
        .unwrap();
    assert!(!state.can_undo());
    assert_eq!(0, state.document().layer_count());
    assert_eq!(None, state.current_layer());
}

#[test]
fn test_layer_defaults_come_from_options() {
    let mut options = EditorOptions::default();
    options.default_layer.cpc = 2;
    options.default_document.hblocks = 5;
    let mut state = EditState::new(options);
    state.create_document(&DocumentProperties::default()).unwrap();
    let layer = state.create_layer(&LayerUpdate::default()).unwrap();
    assert_eq!(5 * 2 * 8, state.document().layer(layer).unwrap().grid().width());
}

#[test]
fn test_operations_replay_from_json() {
    let mut state = editor();
    let layer = state.create_layer(&LayerUpdate::default()).unwrap();
    let script = format!(
        r##"[
            {{ "Paint": {{ "layer": {id}, "x": 2, "y": 0, "cells": [[{{ "ch": 65, "fg": "#ff0000", "bg": "#000000" }}]] }} }},
            {{ "AddFont": {{ "name": "unscii" }} }},
            {{ "UpdateLayer": {{ "layer": {id}, "properties": {{ "title": "ink" }} }} }},
            "Undo",
            "Redo"
        ]"##,
        id = layer.0
    );
    let operations: Vec<Operation> = serde_json::from_str(&script).unwrap();
    for op in operations {
        state.apply(op).unwrap();
    }

    let doc = state.document();
    assert_eq!("ink", doc.layer(layer).unwrap().title());
    assert_eq!(Some(1), doc.font_index("unscii"));
    let cpix = doc.cell(layer, 2, 0).unwrap().unwrap();
    assert_eq!(Cpix::new(1, 3, 2), cpix);
    assert_eq!(Some(Color::new(255, 0, 0)), doc.resolve(cpix).fg);
}

#[test]
fn test_render_changes_after_undo() {
    let mut state = editor();
    let layer = state.create_layer(&LayerUpdate::default()).unwrap();
    state.paint(layer, 3, 3, &glyph('a')).unwrap();
    let rendered = state.snapshot();

    state.undo();
    let changes = state.render_changes(&rendered);
    assert_eq!(1, changes.layers.len());
    let (id, diff) = &changes.layers[0];
    assert_eq!(layer, *id);
    assert_eq!(vec![cpix_engine_edit::diff::DiffAction::Clean { x: 3, y: 3 }], diff.actions);
}

#[test]
fn test_recorded_operations_name_their_history_entry() {
    let mut state = editor();
    let layer = state.create_layer(&LayerUpdate::default()).unwrap();
    let operations = vec![
        Operation::Paint {
            layer,
            x: 0,
            y: 0,
            cells: glyph('a'),
        },
        Operation::UpdatePalette {
            update: PaletteUpdate::Color {
                index: None,
                value: Some(Color::new(9, 9, 9)),
            },
        },
        Operation::UpdateLayer {
            layer,
            properties: LayerUpdate {
                text_margin: Some(2),
                ..Default::default()
            },
        },
        Operation::AddFont { name: "unscii".into() },
        Operation::AddBrush {
            cells: vec![vec![Cpix::new(1, 1, 0)]],
        },
        Operation::StampBrush { layer, brush: 0, x: 4, y: 4 },
        Operation::Erase {
            layer,
            from: (0, 0),
            to: (4, 4),
        },
        Operation::DuplicateLayer { layer },
        Operation::MoveLayer { layer, index: 1 },
        Operation::DeleteLayer { layer },
    ];
    for op in operations {
        assert!(op.is_recorded());
        let description = op.description();
        assert_eq!(Applied::Changed, state.apply(op).unwrap(), "{description}");
        assert!(state.is_last_recorded(&description), "{description}");
    }

    let undo = state.undo_description().map(str::to_string);
    assert!(!Operation::Undo.is_recorded());
    state.apply(Operation::Undo).unwrap();
    assert!(!state.is_last_recorded(undo.as_deref().unwrap()));
}

#[test]
fn test_unchanged_properties_push_no_history() {
    let mut state = editor();
    let layer = state.create_layer(&LayerUpdate::default()).unwrap();
    let before = state.undo_stack().undo_len();

    assert_eq!(Applied::Unchanged, state.set_layer_visible(layer, true).unwrap());
    assert_eq!(Applied::Unchanged, state.update_document(&DocumentProperties::blocks(2, 2)).unwrap());
    assert_eq!(before, state.undo_stack().undo_len());

    assert_eq!(Applied::Changed, state.set_layer_visible(layer, false).unwrap());
    assert_eq!(before + 1, state.undo_stack().undo_len());
}
