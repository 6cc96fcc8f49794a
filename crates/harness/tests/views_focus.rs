use std::cell::RefCell;
use std::rc::Rc;

use snapgrid_core::{FieldValue, RecordId};
use snapgrid_engine::{
    ActionOutcome, CellRef, ChangeEvent, ColumnPatch, EngineError, FocusSet, FocusedCell,
    GridAction, ToggleOutcome,
};
use snapgrid_harness::persistence::FailingPersistence;
use snapgrid_harness::TestWorkbook;

// ============================================================================
// View configuration + persistence
// ============================================================================

#[test]
fn first_override_creates_and_persists_a_view() -> Result<(), Box<dyn std::error::Error>> {
    let mut tw = TestWorkbook::new();
    let table = tw.table_id.clone();

    assert!(tw.workbook.active_view().is_none());
    tw.workbook
        .upsert_column_override(&table, &"email".into(), ColumnPatch::hide(true))?;

    let view = tw.workbook.active_view().expect("view created on demand");
    assert_eq!(view.snapshot_id, tw.workbook.snapshot_id());
    assert!(tw.workbook.is_column_hidden(&table, &"email".into()));

    // The freshly created view went out over the wire
    let upserts = tw.persistence.upserted_views();
    assert_eq!(upserts.len(), 1);
    Ok(())
}

#[test]
fn successive_upserts_merge_and_each_one_persists() -> Result<(), Box<dyn std::error::Error>> {
    let mut tw = TestWorkbook::new();
    let table = tw.table_id.clone();
    let column = "email".into();

    tw.workbook
        .upsert_column_override(&table, &column, ColumnPatch::hide(true))?;
    tw.workbook
        .upsert_column_override(&table, &column, ColumnPatch::protect(true))?;

    let view = tw.workbook.active_view().unwrap();
    let entry = &view.table(&table).unwrap().columns[0];
    assert_eq!(entry.hidden, Some(true));
    assert_eq!(entry.protected, Some(true));

    assert_eq!(tw.persistence.upserted_views().len(), 2);
    Ok(())
}

#[test]
fn toggle_returns_new_value_and_stores_explicit_opposite(
) -> Result<(), Box<dyn std::error::Error>> {
    let mut tw = TestWorkbook::new();
    let table = tw.table_id.clone();
    let column = "notes".into();

    assert!(tw.workbook.toggle_column_hidden(&table, &column)?);
    assert!(tw.workbook.is_column_hidden(&table, &column));

    assert!(!tw.workbook.toggle_column_hidden(&table, &column)?);
    // Toggling back writes explicit false rather than clearing the entry
    let view = tw.workbook.active_view().unwrap();
    assert_eq!(
        view.table(&table).unwrap().columns[0].hidden,
        Some(false)
    );
    Ok(())
}

#[test]
fn hidden_and_protected_flags_are_independent() -> Result<(), Box<dyn std::error::Error>> {
    let mut tw = TestWorkbook::new();
    let table = tw.table_id.clone();
    let column = "name".into();

    tw.workbook.toggle_column_protected(&table, &column)?;

    assert!(tw.workbook.is_column_protected(&table, &column));
    assert!(!tw.workbook.is_column_hidden(&table, &column));
    Ok(())
}

#[test]
fn tables_default_to_visible_and_editable() {
    let tw = TestWorkbook::new();
    let table = tw.table_id.clone();

    // No view at all
    assert!(tw.workbook.is_table_visible(&table));
    assert!(tw.workbook.is_table_editable(&table));
    // Nor for tables the view never mentions
    assert!(tw.workbook.is_table_visible(&"elsewhere".into()));
}

#[test]
fn view_toggle_failure_keeps_local_view() {
    let mut tw = TestWorkbook::failing(FailingPersistence::new());
    let table = tw.table_id.clone();
    let column = "name".into();

    let err = tw.workbook.toggle_column_hidden(&table, &column).unwrap_err();
    assert!(matches!(err, EngineError::Persist(_)));

    // The local toggle survives the failed upsert
    assert!(tw.workbook.is_column_hidden(&table, &column));
}

// ============================================================================
// Focus through the workbook
// ============================================================================

#[test]
fn focus_add_dedups_and_sets_stay_separate() {
    let mut tw = TestWorkbook::new();
    let cell = FocusedCell::new(RecordId::new(), "name");

    tw.workbook.add_focus(FocusSet::Read, &[cell.clone()]);
    tw.workbook.add_focus(FocusSet::Read, &[cell.clone()]);

    assert_eq!(tw.workbook.focus_cells(FocusSet::Read).len(), 1);
    assert!(tw.workbook.focus_cells(FocusSet::Write).is_empty());
}

#[test]
fn clear_all_focus_notifies_both_sets() {
    let mut tw = TestWorkbook::new();
    let cell = FocusedCell::new(RecordId::new(), "name");
    tw.workbook.add_focus(FocusSet::Read, &[cell.clone()]);
    tw.workbook.add_focus(FocusSet::Write, &[cell]);

    let sets = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&sets);
    tw.workbook.subscribe(move |event| {
        if let ChangeEvent::FocusChanged { set } = event {
            sink.borrow_mut().push(*set);
        }
    });

    tw.workbook.clear_all_focus();

    assert!(tw.workbook.focus_cells(FocusSet::Read).is_empty());
    assert!(tw.workbook.focus_cells(FocusSet::Write).is_empty());
    assert_eq!(*sets.borrow(), vec![FocusSet::Read, FocusSet::Write]);
}

// ============================================================================
// Action dispatch
// ============================================================================

#[test]
fn dispatch_routes_suggestion_actions() -> Result<(), Box<dyn std::error::Error>> {
    let mut tw = TestWorkbook::new();
    let id = tw.seed_contact("Ada", None);
    let table = tw.table_id.clone();

    tw.workbook
        .suggest_value(&table, id, "name", FieldValue::Text("Ada L.".into()))?;

    let outcome = tw.workbook.dispatch(GridAction::AcceptSuggestions {
        table: table.clone(),
        items: vec![CellRef::cell(id, "name")],
    })?;
    match outcome {
        ActionOutcome::Reconciled(r) => {
            assert_eq!(r.records_affected, 1);
            assert_eq!(r.changes_affected, 1);
        }
        other => panic!("expected Reconciled, got {other:?}"),
    }
    assert_eq!(tw.record(id).base_value(&"name".into()), &"Ada L.".into());
    Ok(())
}

#[test]
fn dispatch_reject_all_clears_every_suggestion() -> Result<(), Box<dyn std::error::Error>> {
    let mut tw = TestWorkbook::new();
    let a = tw.seed_contact("Ada", None);
    let b = tw.seed_contact("Grace", None);
    let table = tw.table_id.clone();

    tw.workbook
        .suggest_value(&table, a, "name", FieldValue::Text("x".into()))?;
    tw.workbook.suggest_delete(&table, b)?;

    let outcome = tw
        .workbook
        .dispatch(GridAction::RejectAllSuggestions { table: table.clone() })?;
    match outcome {
        ActionOutcome::Reconciled(r) => assert_eq!(r.records_affected, 2),
        other => panic!("expected Reconciled, got {other:?}"),
    }
    assert!(!tw.record(a).has_suggestions());
    assert!(!tw.record(b).suggestions.delete_proposed);
    Ok(())
}

#[test]
fn dispatch_covers_per_cell_reject_and_table_wide_accept(
) -> Result<(), Box<dyn std::error::Error>> {
    let mut tw = TestWorkbook::new();
    let id = tw.seed_contact("Ada", None);
    let table = tw.table_id.clone();

    tw.workbook
        .suggest_value(&table, id, "name", FieldValue::Text("x".into()))?;
    tw.workbook
        .suggest_value(&table, id, "email", FieldValue::Text("y".into()))?;

    tw.workbook.dispatch(GridAction::RejectSuggestions {
        table: table.clone(),
        items: vec![CellRef::cell(id, "name")],
    })?;
    assert_eq!(tw.record(id).base_value(&"name".into()), &"Ada".into());

    let outcome = tw
        .workbook
        .dispatch(GridAction::AcceptAllSuggestions { table: table.clone() })?;
    match outcome {
        ActionOutcome::Reconciled(r) => assert_eq!(r.changes_affected, 1),
        other => panic!("expected Reconciled, got {other:?}"),
    }
    assert_eq!(tw.record(id).base_value(&"email".into()), &"y".into());
    Ok(())
}

#[test]
fn dispatch_toggle_protected_reports_new_value() -> Result<(), Box<dyn std::error::Error>> {
    let mut tw = TestWorkbook::new();
    let table = tw.table_id.clone();

    let outcome = tw.workbook.dispatch(GridAction::ToggleColumnProtected {
        table: table.clone(),
        column: "notes".into(),
    })?;
    assert_eq!(outcome, ActionOutcome::ViewToggled(true));
    assert!(tw.workbook.is_column_protected(&table, &"notes".into()));
    Ok(())
}

#[test]
fn dispatch_delete_and_undelete_records() -> Result<(), Box<dyn std::error::Error>> {
    let mut tw = TestWorkbook::new();
    let id = tw.seed_contact("Ada", None);
    let table = tw.table_id.clone();

    let outcome = tw.workbook.dispatch(GridAction::DeleteRecords {
        table: table.clone(),
        ids: vec![id],
    })?;
    assert_eq!(outcome, ActionOutcome::Applied);
    assert!(tw.record(id).edits.deleted);

    tw.workbook.dispatch(GridAction::UndeleteRecords {
        table: table.clone(),
        ids: vec![id],
    })?;
    assert!(!tw.record(id).edits.deleted);
    Ok(())
}

#[test]
fn dispatch_toggle_hidden_reports_new_value() -> Result<(), Box<dyn std::error::Error>> {
    let mut tw = TestWorkbook::new();
    let table = tw.table_id.clone();

    let outcome = tw.workbook.dispatch(GridAction::ToggleColumnHidden {
        table: table.clone(),
        column: "email".into(),
    })?;
    assert_eq!(outcome, ActionOutcome::ViewToggled(true));

    let outcome = tw.workbook.dispatch(GridAction::ToggleColumnHidden {
        table,
        column: "email".into(),
    })?;
    assert_eq!(outcome, ActionOutcome::ViewToggled(false));
    Ok(())
}

#[test]
fn dispatch_focus_toggle_and_clear() -> Result<(), Box<dyn std::error::Error>> {
    let mut tw = TestWorkbook::new();
    let record = RecordId::new();
    let cells: Vec<FocusedCell> = ["name", "email", "notes"]
        .iter()
        .map(|col| FocusedCell::new(record, *col))
        .collect();
    tw.workbook.add_focus(FocusSet::Write, &cells[..1]);

    let outcome = tw.workbook.dispatch(GridAction::ToggleFocus {
        set: FocusSet::Write,
        cells: cells.clone(),
    })?;
    assert_eq!(
        outcome,
        ActionOutcome::FocusToggled(ToggleOutcome { added: 2, removed: 1 })
    );

    let outcome = tw
        .workbook
        .dispatch(GridAction::ClearFocus { set: FocusSet::Write })?;
    assert_eq!(outcome, ActionOutcome::FocusCleared);
    assert!(tw.workbook.focus_cells(FocusSet::Write).is_empty());
    Ok(())
}
