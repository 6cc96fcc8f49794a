use snapgrid_core::{FieldValue, Record, RecordId, SnapshotId, Table};
use snapgrid_engine::{CellRef, EngineError, ReconcileDecision, Workbook};
use snapgrid_harness::persistence::FailingPersistence;
use snapgrid_harness::{contacts_table, TestWorkbook};

// ============================================================================
// Accept
// ============================================================================

#[test]
fn accept_round_trip_promotes_suggestion() -> Result<(), Box<dyn std::error::Error>> {
    let mut tw = TestWorkbook::new();
    let id = tw.create_contact("Ada", None)?;
    let table = tw.table_id.clone();

    tw.workbook
        .suggest_value(&table, id, "name", FieldValue::Text("Ada Lovelace".into()))?;

    let outcome = tw
        .workbook
        .accept_cells(&table, vec![CellRef::cell(id, "name")])?;
    assert_eq!(outcome.records_affected, 1);
    assert_eq!(outcome.changes_affected, 1);

    let record = tw.record(id);
    assert_eq!(record.base_value(&"name".into()), &"Ada Lovelace".into());
    assert!(!record.has_suggestions());

    // The decision was reported to persistence
    let reconciles = tw.persistence.reconciles();
    assert_eq!(reconciles.len(), 1);
    assert_eq!(reconciles[0].1, ReconcileDecision::Accept);
    Ok(())
}

#[test]
fn accepted_suggestion_wins_over_pending_edit() -> Result<(), Box<dyn std::error::Error>> {
    let mut tw = TestWorkbook::new();
    let id = tw.create_contact("Ada", None)?;
    let table = tw.table_id.clone();

    tw.edit_cell(id, "name", FieldValue::Text("local edit".into()))?;
    tw.workbook
        .suggest_value(&table, id, "name", FieldValue::Text("agent value".into()))?;

    tw.workbook
        .accept_cells(&table, vec![CellRef::cell(id, "name")])?;

    let record = tw.record(id);
    // The concurrently pending edit is discarded without confirmation
    assert!(!record.has_pending_edit(&"name".into()));
    assert_eq!(record.editable_value(&"name".into()), &"agent value".into());
    Ok(())
}

#[test]
fn accept_delete_proposal_confirms_without_removal() -> Result<(), Box<dyn std::error::Error>> {
    let mut tw = TestWorkbook::new();
    let id = tw.create_contact("Ada", None)?;
    let table = tw.table_id.clone();

    tw.workbook.suggest_delete(&table, id)?;
    let outcome = tw.workbook.accept_cells(&table, vec![CellRef::record(id)])?;

    assert_eq!(outcome.records_affected, 1);
    // Confirmation clears the marker; physical removal is the caller's move
    assert!(!tw.record(id).suggestions.delete_proposed);
    assert_eq!(tw.workbook.records(&table).len(), 1);
    Ok(())
}

// ============================================================================
// Reject + idempotence
// ============================================================================

#[test]
fn reject_keeps_fields_and_second_call_reports_zero() -> Result<(), Box<dyn std::error::Error>> {
    let mut tw = TestWorkbook::new();
    let id = tw.create_contact("Ada", None)?;
    let table = tw.table_id.clone();

    tw.workbook
        .suggest_value(&table, id, "email", FieldValue::Text("a@b.c".into()))?;

    let first = tw
        .workbook
        .reject_cells(&table, vec![CellRef::cell(id, "email")])?;
    assert_eq!(first.changes_affected, 1);
    assert_eq!(tw.record(id).base_value(&"email".into()), &FieldValue::Null);

    let second = tw
        .workbook
        .reject_cells(&table, vec![CellRef::cell(id, "email")])?;
    assert!(second.is_empty());

    // The zero-count second call never reached persistence
    assert_eq!(tw.persistence.reconciles().len(), 1);
    Ok(())
}

#[test]
fn reconcile_without_suggestions_is_informational() -> Result<(), Box<dyn std::error::Error>> {
    let mut tw = TestWorkbook::new();
    let table = tw.table_id.clone();
    let id = tw.create_contact("Ada", None)?;

    let outcome = tw
        .workbook
        .accept_cells(&table, vec![CellRef::cell(id, "name")])?;
    assert!(outcome.is_empty());

    let all = tw.workbook.accept_all_for_table(&table)?;
    assert!(all.is_empty());
    Ok(())
}

// ============================================================================
// Table-wide expansion
// ============================================================================

#[test]
fn accept_all_expands_every_pending_suggestion() -> Result<(), Box<dyn std::error::Error>> {
    let mut tw = TestWorkbook::new();
    let a = tw.create_contact("Ada", None)?;
    let b = tw.create_contact("Grace", None)?;
    let table = tw.table_id.clone();

    tw.workbook
        .suggest_value(&table, a, "name", FieldValue::Text("Ada L.".into()))?;
    tw.workbook
        .suggest_value(&table, a, "email", FieldValue::Text("ada@x".into()))?;
    tw.workbook.suggest_delete(&table, b)?;

    let outcome = tw.workbook.accept_all_for_table(&table)?;
    assert_eq!(outcome.records_affected, 2);
    assert_eq!(outcome.changes_affected, 3);

    // The expanded item list is what got submitted
    let reconciles = tw.persistence.reconciles();
    assert_eq!(reconciles.len(), 1);
    assert_eq!(reconciles[0].2.len(), 3);
    Ok(())
}

#[test]
fn reject_all_clears_without_touching_base() -> Result<(), Box<dyn std::error::Error>> {
    let mut tw = TestWorkbook::new();
    let id = tw.create_contact("Ada", None)?;
    let table = tw.table_id.clone();

    tw.workbook
        .suggest_value(&table, id, "name", FieldValue::Text("other".into()))?;
    tw.workbook.reject_all_for_table(&table)?;

    let record = tw.record(id);
    assert_eq!(record.base_value(&"name".into()), &"Ada".into());
    assert!(!record.has_suggestions());
    Ok(())
}

// ============================================================================
// Optimistic reconcile under network failure
// ============================================================================

#[test]
fn accept_keeps_local_change_when_submission_fails() {
    let failing = FailingPersistence::new();
    let table: Table = contacts_table();
    let table_id = table.id.clone();

    // Seed one record with a pending suggestion directly
    let mut record = Record::new(RecordId::new(), Default::default());
    record.fields.insert("name".into(), "old".into());
    record
        .suggestions
        .values
        .insert("name".into(), "new".into());
    let id = record.id;

    let mut workbook = Workbook::new(SnapshotId::new(), Box::new(failing.clone()));
    workbook.add_table(table, vec![record]);

    let err = workbook
        .accept_cells(&table_id, vec![CellRef::cell(id, "name")])
        .unwrap_err();
    assert!(matches!(err, EngineError::Persist(_)));

    // The locally accepted value stays; retry is the caller's call
    let record = workbook.record(&table_id, id).unwrap();
    assert_eq!(record.base_value(&"name".into()), &"new".into());
    assert!(!record.has_suggestions());
}
