//! Integration tests for the admin API client.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use gymdesk_cli::{client::AdminApiClient, config::ClientConfig};
    use gymdesk_shared::{
        wire::{LogQuery, OrganizationQuery, PaymentQuery, SubscriptionAction},
        ApiError, BillingCycle, CreationDialog, FieldUpdate, FormError, LogoFile, NewPayment,
        PaymentMode, PlanInput, PlansApi,
    };
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn client_for(server: &MockServer) -> AdminApiClient {
        let config = ClientConfig {
            api_base: server.uri(),
            token: Some("admin-token".to_string()),
            timeout: Duration::from_secs(5),
        };
        AdminApiClient::new(&config).expect("build client")
    }

    fn plans_body() -> serde_json::Value {
        json!({
            "success": true,
            "data": {
                "plans": [
                    { "_id": "basic", "name": "Basic", "branchLimit": 1, "memberLimitPerBranch": 100 },
                    { "_id": "pro", "name": "Pro", "branchLimit": 3, "memberLimitPerBranch": 500 }
                ]
            }
        })
    }

    fn filled_dialog() -> CreationDialog {
        let plans: Vec<gymdesk_shared::Plan> =
            serde_json::from_value(plans_body()["data"]["plans"].clone()).expect("plans");
        let mut dialog = CreationDialog::new();
        dialog.open();
        let form = dialog.form_mut().expect("editable");
        for (field, value) in [
            ("gymName", "Iron Temple"),
            ("contactEmail", "hello@iron.example"),
            ("owner.name", "Dana"),
            ("owner.email", "dana@iron.example"),
            ("owner.password", "s3cret!"),
            ("subscription.planId", "pro"),
            ("subscription.billingCycle", "monthly"),
            ("mainBranch.name", "Downtown"),
        ] {
            form.apply(FieldUpdate::from_path(field, value).expect("known field"));
        }
        form.add_branch(&plans).expect("first branch");
        form.add_branch(&plans).expect("second branch");
        form.apply(FieldUpdate::from_path("branches.0.name", "North").expect("field"));
        form.apply(FieldUpdate::from_path("branches.1.name", "South").expect("field"));
        form.set_main_logo(LogoFile::new("main.png", "image/png", b"MAIN".to_vec()));
        assert!(form.set_branch_logo(1, LogoFile::new("south.png", "image/png", b"SOUTH".to_vec())));
        assert!(form.set_branch_logo(0, LogoFile::new("north.png", "image/png", b"NORTH".to_vec())));
        dialog
    }

    fn position(haystack: &[u8], needle: &str) -> usize {
        haystack
            .windows(needle.len())
            .position(|window| window == needle.as_bytes())
            .unwrap_or_else(|| panic!("`{needle}` missing from body"))
    }

    #[tokio::test]
    async fn plans_are_decoded_from_the_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/plans"))
            .and(header("authorization", "Bearer admin-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(plans_body()))
            .mount(&server)
            .await;

        let plans = client_for(&server).list_plans().await.expect("plans");
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[1].id, "pro");
        assert_eq!(plans[1].max_additional_branches(), Some(2));
    }

    #[tokio::test]
    async fn create_sends_data_then_logos_in_branch_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/organizations"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "data": { "organization": { "_id": "org-1", "name": "Iron Temple" } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let mut dialog = filled_dialog();
        let created = dialog.submit(&client).await.expect("created");
        assert_eq!(created.id, "org-1");
        assert!(!dialog.is_open());
        assert!(dialog.form().draft().gym_name.is_empty());

        let requests = server.received_requests().await.expect("recording enabled");
        let body = &requests[0].body;
        let data = position(body, "name=\"data\"");
        let main = position(body, "name=\"mainBranchLogo\"");
        let north = position(body, "NORTH");
        let south = position(body, "SOUTH");
        assert!(data < main && main < north && north < south);
        assert!(String::from_utf8_lossy(body).contains("\"gymName\":\"Iron Temple\""));
    }

    #[tokio::test]
    async fn rejected_create_keeps_the_draft_and_surfaces_the_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/organizations"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "message": "Contact email already exists"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let mut dialog = filled_dialog();
        let before = dialog.form().draft().clone();
        let err = dialog.submit(&client).await.expect_err("rejected");
        assert_eq!(err.user_message(), "Contact email already exists");
        assert_eq!(dialog.last_error(), Some("Contact email already exists"));
        assert_eq!(dialog.form().draft(), &before);
        assert!(dialog.form().branch_logo(0).is_some());
    }

    #[tokio::test]
    async fn token_failure_maps_to_session_expired() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/plans"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "success": false,
                "message": "Not authorized, token failed"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).list_plans().await.expect_err("unauthorized");
        assert!(err.is_session_expired());
        assert!(matches!(err, ApiError::SessionExpired(_)));
    }

    #[tokio::test]
    async fn organization_list_sends_one_based_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/organizations"))
            .and(query_param("page", "3"))
            .and(query_param("search", "iron"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": [
                    { "_id": "o1", "name": "Iron Temple", "ownerName": "Dana", "status": "active" }
                ],
                "pagination": { "total": 21, "page": 3, "totalPages": 3 }
            })))
            .mount(&server)
            .await;

        let query = OrganizationQuery {
            search: "iron".to_string(),
            page: 2,
            ..OrganizationQuery::default()
        };
        let page = client_for(&server)
            .list_organizations(&query)
            .await
            .expect("page");
        assert_eq!(page.total, 21);
        assert_eq!(page.items[0].name, "Iron Temple");
    }

    #[tokio::test]
    async fn renew_patches_with_billing_cycle() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/subscriptions/s1/renew"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .subscription_action("s1", SubscriptionAction::Renew(BillingCycle::Yearly))
            .await
            .expect("renewed");

        let requests = server.received_requests().await.expect("recording enabled");
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).expect("json body");
        assert_eq!(body, json!({ "billingCycle": "yearly" }));
    }

    #[tokio::test]
    async fn submit_without_open_dialog_never_hits_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let mut dialog: CreationDialog = CreationDialog::new();
        let err = dialog.submit(&client_for(&server)).await.expect_err("closed");
        assert!(matches!(err, FormError::DialogClosed));
    }

    #[tokio::test]
    async fn payments_list_and_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/payments"))
            .and(query_param("page", "2"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "payments": [{
                        "_id": "pay1",
                        "gymOrganization": { "_id": "o1", "name": "Iron Temple" },
                        "amount": 4999.0,
                        "paymentMode": "upi",
                        "billingCycle": "yearly",
                        "transactionReference": "UTR123",
                        "paymentDate": "2026-09-01T10:00:00.000Z",
                        "enteredBy": { "name": "Root Admin" }
                    }],
                    "total": 11
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/payments"))
            .and(body_json(json!({
                "gymOrganization": "o1",
                "subscriptionId": "s1",
                "amount": 4999.0,
                "billingCycle": "yearly",
                "paymentMode": "upi",
                "transactionReference": "UTR123",
                "notes": ""
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let page = client
            .list_payments(&PaymentQuery {
                page: 1,
                ..PaymentQuery::default()
            })
            .await
            .expect("payments");
        assert_eq!(page.total, 11);
        assert_eq!(page.items[0].organization_name(), "Iron Temple");

        client
            .record_payment(&NewPayment {
                gym_organization: "o1".to_string(),
                subscription_id: "s1".to_string(),
                amount: 4999.0,
                billing_cycle: BillingCycle::Yearly,
                payment_mode: PaymentMode::Upi,
                transaction_reference: "UTR123".to_string(),
                notes: String::new(),
            })
            .await
            .expect("recorded");
    }

    #[tokio::test]
    async fn logs_forward_action_and_search() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/logs"))
            .and(query_param("action", "Gym Suspended"))
            .and(query_param("search", "iron"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "logs": [{
                        "_id": "l1",
                        "action": "Gym Suspended",
                        "gymOrganization": { "name": "Iron Temple" },
                        "details": "non-payment",
                        "performedBy": { "name": "Root Admin" },
                        "timestamp": "2026-09-01T10:00:00.000Z"
                    }],
                    "total": 1
                }
            })))
            .mount(&server)
            .await;

        let query = LogQuery {
            action: "Gym Suspended".to_string(),
            search: "iron".to_string(),
            ..LogQuery::default()
        };
        let page = client_for(&server).list_logs(&query).await.expect("logs");
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].details_text(), "non-payment");
        assert_eq!(page.items[0].performed_by_name(), "Root Admin");
    }

    #[tokio::test]
    async fn plan_writes_use_post_put_and_patch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/plans"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "data": { "plan": { "_id": "p9", "name": "Gold", "branchLimit": 4 } }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/plans/p9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/plans/p9/toggle"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "_id": "p9", "name": "Gold", "isActive": false }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let input = PlanInput {
            name: "Gold".to_string(),
            branch_limit: 4,
            ..PlanInput::default()
        };
        let created = client.create_plan(&input).await.expect("created");
        assert_eq!(created.map(|plan| plan.id), Some("p9".to_string()));

        let updated = client.update_plan("p9", &input).await.expect("updated");
        assert!(updated.is_none());

        let toggled = client.toggle_plan("p9").await.expect("toggled").expect("plan echoed");
        assert!(!toggled.is_active);

        let requests = server.received_requests().await.expect("recording enabled");
        let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).expect("json body");
        assert_eq!(sent["name"], "Gold");
        assert_eq!(sent["branchLimit"], 4);
        assert_eq!(sent["memberLimitPerBranch"], 300);
    }

    #[tokio::test]
    async fn csv_export_is_returned_verbatim() {
        let server = MockServer::start().await;
        let csv = "Organization,Plan,Status\nIron Temple,Pro,active\n";
        Mock::given(method("GET"))
            .and(path("/subscriptions/export-csv"))
            .and(header("authorization", "Bearer admin-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string(csv))
            .mount(&server)
            .await;

        let exported = client_for(&server)
            .export_subscriptions_csv()
            .await
            .expect("csv");
        assert_eq!(exported, csv);
    }

    #[tokio::test]
    async fn dashboard_kpis_are_unwrapped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dashboard/kpis"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "totalGyms": 12,
                    "activeGyms": 10,
                    "suspendedGyms": 2,
                    "totalMembers": 840,
                    "monthlyRevenue": 15000.0,
                    "totalRevenue": 120000.0,
                    "upcomingExpiry": 3
                }
            })))
            .mount(&server)
            .await;

        let kpis = client_for(&server).dashboard_kpis().await.expect("kpis");
        assert_eq!(kpis.total_gyms, 12);
        assert_eq!(kpis.suspended_gyms, 2);
        assert_eq!(kpis.upcoming_expiry, 3);
    }
}
