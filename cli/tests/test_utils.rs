//! Integration tests for CLI utilities and command helpers.

#[cfg(test)]
mod tests {
    use std::io::Write;

    use gymdesk_cli::{
        cli::PlanArgs,
        commands::{
            logs::logs_table,
            organizations::{fill_dialog, CreateRequest},
            plans::{plan_input, plans_table},
        },
        utils,
    };
    use gymdesk_shared::{AuditLogEntry, CreationDialog, Plan, PlanInput};
    use tempfile::{Builder, NamedTempFile};

    fn plans() -> Vec<Plan> {
        serde_json::from_str(
            r#"[
                { "_id": "basic", "name": "Basic", "branchLimit": 1 },
                { "_id": "pro", "name": "Pro", "branchLimit": 3 }
            ]"#,
        )
        .expect("plans")
    }

    fn draft_file(json: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(".json").tempfile().expect("create temp file");
        file.write_all(json.as_bytes()).expect("write draft");
        file.flush().expect("flush draft");
        file
    }

    fn logo_file(bytes: &[u8]) -> NamedTempFile {
        let mut file = Builder::new().suffix(".PNG").tempfile().expect("create temp logo");
        file.write_all(bytes).expect("write logo");
        file.flush().expect("flush logo");
        file
    }

    #[test]
    fn read_logo_guesses_content_type_from_extension() {
        let file = logo_file(b"\x89PNG");
        let logo = utils::read_logo(file.path()).expect("read logo");
        assert_eq!(logo.content_type, "image/png");
        assert_eq!(logo.bytes, b"\x89PNG");
        assert!(logo.file_name.ends_with(".PNG"));
    }

    #[test]
    fn read_draft_accepts_partial_documents() {
        let file = draft_file(r#"{ "gymName": "Iron Temple", "owner": { "email": "dana@iron.example" } }"#);
        let draft = utils::read_draft(file.path()).expect("read draft");
        assert_eq!(draft.gym_name, "Iron Temple");
        assert_eq!(draft.owner.email, "dana@iron.example");
        assert_eq!(draft.main_branch.floor_count, 1);
    }

    #[test]
    fn render_table_aligns_columns() {
        let rows = vec![vec!["o1".to_string(), "Iron Temple".to_string()]];
        let table = utils::render_table(&["ID", "NAME"], &rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "ID  NAME");
        assert_eq!(lines[1], "--  -----------");
        assert_eq!(lines[2], "o1  Iron Temple");
    }

    #[test]
    fn fill_dialog_loads_draft_overrides_and_logos() {
        let draft = draft_file(
            r#"{
                "gymName": "Iron Temple",
                "subscription": { "planId": "pro", "billingCycle": "monthly" },
                "branches": [ { "name": "North" }, { "name": "South", "floorCount": 0 } ]
            }"#,
        );
        let logo = logo_file(b"SOUTH");
        let mut dialog = CreationDialog::new();
        dialog.open();
        let request = CreateRequest {
            draft: Some(draft.path().to_path_buf()),
            sets: vec![("owner.email".to_string(), "dana@iron.example".to_string())],
            main_logo: None,
            branch_logos: vec![(1, logo.path().to_path_buf())],
        };
        fill_dialog(&mut dialog, &plans(), request).expect("fill dialog");

        let form = dialog.form();
        assert_eq!(form.draft().owner.email, "dana@iron.example");
        assert_eq!(form.draft().branches.len(), 2);
        assert_eq!(form.draft().branches[1].floor_count, 1);
        assert_eq!(form.branch_logo(1).map(|logo| logo.bytes.as_slice()), Some(&b"SOUTH"[..]));
        assert!(form.branch_logo(0).is_none());
    }

    #[test]
    fn fill_dialog_rejects_drafts_over_the_plan_limit() {
        let draft = draft_file(
            r#"{
                "subscription": { "planId": "basic" },
                "branches": [ { "name": "North" } ]
            }"#,
        );
        let mut dialog = CreationDialog::new();
        dialog.open();
        let request = CreateRequest {
            draft: Some(draft.path().to_path_buf()),
            ..CreateRequest::default()
        };
        let err = fill_dialog(&mut dialog, &plans(), request).expect_err("over limit");
        assert!(format!("{err:#}").contains("maximum number of branches"));
        assert!(dialog.form().draft().branches.is_empty());
    }

    #[test]
    fn fill_dialog_rejects_logo_for_missing_branch() {
        let logo = logo_file(b"X");
        let mut dialog = CreationDialog::new();
        dialog.open();
        let request = CreateRequest {
            branch_logos: vec![(0, logo.path().to_path_buf())],
            ..CreateRequest::default()
        };
        let err = fill_dialog(&mut dialog, &plans(), request).expect_err("no branch");
        assert!(err.to_string().contains("no branch at position 0"));
    }

    #[test]
    fn fill_dialog_refuses_edits_while_submitting() {
        let mut dialog = CreationDialog::new();
        dialog.open();
        dialog.begin_submit().expect("submit starts");
        let request = CreateRequest {
            sets: vec![("gymName".to_string(), "Late Edit".to_string())],
            ..CreateRequest::default()
        };
        let err = fill_dialog(&mut dialog, &plans(), request).expect_err("in flight");
        assert!(err.to_string().contains("already in progress"));
        assert!(dialog.form().draft().gym_name.is_empty());
    }

    #[test]
    fn plan_update_keeps_unset_fields() {
        let current = &plans()[1];
        let fields = PlanArgs {
            price_monthly: Some(59.0),
            features: vec![("qrCheckIn".to_string(), true)],
            ..PlanArgs::default()
        };
        let input = plan_input(PlanInput::from(current), fields).expect("valid plan");
        assert_eq!(input.name, "Pro");
        assert_eq!(input.branch_limit, 3);
        assert_eq!(input.price_monthly, 59.0);
        assert_eq!(input.features.get("qrCheckIn"), Some(&true));

        let err = plan_input(PlanInput::default(), PlanArgs::default()).expect_err("name required");
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn plans_table_marks_only_enterprise_unlimited() {
        let catalog: Vec<Plan> = serde_json::from_str(
            r#"[
                { "_id": "ent", "name": "Enterprise", "branchLimit": 1 },
                { "_id": "starter", "name": "Starter", "branchLimit": 0 }
            ]"#,
        )
        .expect("plans");
        let table = plans_table(&catalog);
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[2].contains("unlimited"));
        assert!(!lines[3].contains("unlimited"));
    }

    #[test]
    fn logs_table_shortens_long_details() {
        let entry: AuditLogEntry = serde_json::from_value(serde_json::json!({
            "_id": "l1",
            "action": "Gym Updated",
            "details": "x".repeat(200),
            "timestamp": "2026-09-01T10:00:00.000Z"
        }))
        .expect("log entry");
        let table = logs_table(&[entry]);
        let row = table.lines().nth(2).expect("data row");
        assert!(row.contains("2026-09-01 10:00:00"));
        assert!(row.contains('…'));
        assert!(!row.contains(&"x".repeat(61)));
    }
}
