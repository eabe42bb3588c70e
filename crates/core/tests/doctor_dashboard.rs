mod common;

use std::sync::Arc;
use std::time::Duration;

use clinic_core::controllers::doctor_dashboard::{APPOINTMENTS_FAILED, NO_APPOINTMENTS};
use clinic_core::controllers::DoctorDashboard;
use clinic_core::{render_text, ActionOutcome, CardAction, Role};
use common::{cells, date, Page};
use test_backend::doctor_token;

fn dashboard(page: &Page) -> DoctorDashboard {
    page.sign_in(&doctor_token(1), Role::Doctor);
    DoctorDashboard::with_clock(
        page.ctx.clone(),
        page.list_view(),
        Arc::new(|| date(2024, 1, 1)),
    )
}

#[tokio::test]
async fn defaults_to_today_and_null_name() {
    let page = Page::start().await;
    let dash = dashboard(&page);

    assert_eq!(dash.selected_date(), date(2024, 1, 1));
    assert_eq!(dash.patient_name(), "null");

    dash.load().await;
    assert_eq!(
        page.backend.requests(),
        vec![format!("GET /appointments/2024-01-01/null/{}", doctor_token(1))]
    );
    assert_eq!(page.view.len(), 2);
}

#[tokio::test]
async fn one_appointment_renders_one_matching_row() {
    let page = Page::start().await;
    let dash = dashboard(&page);

    dash.on_date_change(date(2024, 1, 2)).await;

    let rows = page.nodes();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        cells(&rows[0])[..4],
        ["1", "Alice Smith", "5550000001", "alice@mail.test"]
    );
    assert_eq!(rows[0].key(), Some("3"));
}

#[tokio::test]
async fn empty_day_renders_a_single_placeholder_row() {
    let page = Page::start().await;
    let dash = dashboard(&page);

    dash.on_date_change(date(2024, 3, 3)).await;

    let rows = page.nodes();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].text_content(), NO_APPOINTMENTS);
    assert_eq!(
        rows[0].find_by_tag("td")[0].attribute("colspan"),
        Some("4")
    );
}

#[tokio::test]
async fn transport_failure_renders_error_row() {
    let page = Page::start().await.unreachable().await;
    let dash = dashboard(&page);

    dash.load().await;

    let rows = page.nodes();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].text_content(), APPOINTMENTS_FAILED);
}

#[tokio::test]
async fn search_input_narrows_and_blank_resets_to_null() {
    let page = Page::start().await;
    let dash = dashboard(&page);

    dash.on_search_input("Bob").await;
    assert_eq!(dash.patient_name(), "Bob");
    assert_eq!(page.view.len(), 1);
    assert!(render_text(&page.nodes()[0]).starts_with("2 | Bob Jones"));

    dash.on_search_input("   ").await;
    assert_eq!(dash.patient_name(), "null");
    assert_eq!(page.view.len(), 2);
}

#[tokio::test]
async fn today_resets_the_selected_date() {
    let page = Page::start().await;
    let dash = dashboard(&page);

    dash.on_date_change(date(2024, 1, 2)).await;
    dash.on_today().await;

    assert_eq!(dash.selected_date(), date(2024, 1, 1));
    assert_eq!(page.view.len(), 2);
    assert_eq!(page.view.render_count(), 2);
}

#[tokio::test]
async fn date_then_name_change_renders_the_combined_latest_query() {
    let page = Page::start().await;
    let dash = dashboard(&page);
    // The date-only reload answers after the combined one.
    page.backend
        .delay_appointments_for("null", Duration::from_millis(300));

    tokio::join!(
        dash.on_date_change(date(2024, 1, 2)),
        dash.on_search_input("Alice"),
    );

    let rows = page.nodes();
    assert_eq!(rows.len(), 1);
    assert_eq!(cells(&rows[0])[1], "Alice Smith");
    assert_eq!(rows[0].key(), Some("3"));
    assert_eq!(page.view.render_count(), 1);
    assert_eq!(page.backend.count_matching("GET /appointments/2024-01-02/"), 2);
}

#[tokio::test]
async fn prescription_control_redirects_with_appointment_id() {
    let page = Page::start().await;
    let dash = dashboard(&page);
    dash.load().await;

    let action = page.nodes()[0].actions()[0].clone();
    assert_eq!(action, CardAction::AddPrescription { appointment_id: 1 });

    let outcome = dash.actions().activate(&action).await;
    assert_eq!(
        outcome,
        ActionOutcome::Redirected("/pages/addPrescription.html?appointmentId=1".into())
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_searches_render_the_final_query() {
    let page = Page::start().await;
    let dash = Arc::new(dashboard(&page));

    for round in 0..20 {
        let names = if round % 2 == 0 { ["Alice", "Bob"] } else { ["Bob", "Alice"] };
        let handles: Vec<_> = names
            .into_iter()
            .map(|name| {
                let dash = dash.clone();
                tokio::spawn(async move { dash.on_search_input(name).await })
            })
            .collect();
        for handle in handles {
            handle.await.expect("search task");
        }

        let rows = page.nodes();
        assert_eq!(rows.len(), 1);
        assert!(cells(&rows[0])[1].starts_with(dash.patient_name().as_str()));
    }
}
