use shorturl_client::HttpAdminClient;
use shorturl_core::{AdminApi, ApiVariant, CoreError, Mapping, ShortCode};
use shorturl_panel::html::escape;
use shorturl_panel::{
    AdminPanel, Dispatch, HtmlTableView, InitOutcome, PanelEvent, SessionConfig, UNAUTHORIZED_ALERT,
};
use shorturl_test_infra::{BackendConfig, FakeBackend};

type Panel = AdminPanel<HttpAdminClient, HtmlTableView>;

async fn panel_for(backend: &FakeBackend, key: &str) -> Panel {
    let page_url = format!("{}?apikey={key}", backend.origin());
    let session = SessionConfig::from_page_url(&page_url, backend.client_variant()).unwrap();
    let client = HttpAdminClient::new(
        &backend.origin(),
        session.variant.clone(),
        session.api_key.clone(),
    )
    .unwrap();
    AdminPanel::new(session, client, HtmlTableView::new())
}

async fn start(variant: ApiVariant, mappings: Vec<Mapping>) -> FakeBackend {
    FakeBackend::start(
        BackendConfig::builder()
            .variant(variant)
            .mappings(mappings)
            .build(),
    )
    .await
    .expect("start backend")
}

fn variants() -> Vec<ApiVariant> {
    vec![
        ApiVariant::V1,
        ApiVariant::Legacy,
        ApiVariant::configurable("/admin/v1"),
    ]
}

#[tokio::test]
async fn initialize_renders_backend_table() {
    for variant in variants() {
        let backend = start(
            variant.clone(),
            vec![Mapping::new("abc", "https://example.com")],
        )
        .await;
        let panel = panel_for(&backend, backend.api_key()).await;

        assert_eq!(panel.initialize().await.unwrap(), InitOutcome::Active);

        let host = panel.session().host.clone();
        let markup = panel.view().markup();
        let long = escape("https://example.com");
        assert!(
            markup.contains(&format!("<a href=\"{long}\">{long}</a>")),
            "variant {variant}"
        );
        assert!(
            markup.contains(&format!(
                "<a href=\"{}\">{}</a>",
                escape("/abc"),
                escape(&format!("{host}/abc"))
            )),
            "variant {variant}"
        );
    }
}

#[tokio::test]
async fn submit_sends_one_create_and_shows_new_row() {
    for variant in variants() {
        let backend = start(variant.clone(), Vec::new()).await;
        let panel = panel_for(&backend, backend.api_key()).await;
        panel.initialize().await.unwrap();

        panel.view().fill_form("https://example.com", "abc");
        let outcome = panel.dispatch(panel.view().submit_event()).await.unwrap();

        assert_eq!(outcome, Dispatch::Applied, "variant {variant}");
        assert_eq!(backend.requests_with_method("POST").len(), 1, "variant {variant}");
        assert_eq!(
            backend.mappings(),
            vec![Mapping::new("abc", "https://example.com")]
        );
        assert_eq!(panel.view().form(), (String::new(), String::new()));
        assert!(panel.view().markup().contains("data-short-code=\"abc\""));
    }
}

#[tokio::test]
async fn duplicate_submit_keeps_form_and_reports() {
    let backend = start(
        ApiVariant::V1,
        vec![Mapping::new("abc", "https://example.com")],
    )
    .await;
    let panel = panel_for(&backend, backend.api_key()).await;
    panel.initialize().await.unwrap();

    panel.view().fill_form("https://other.example", "abc");
    let outcome = panel.dispatch(panel.view().submit_event()).await.unwrap();

    assert!(matches!(
        outcome,
        Dispatch::Failed(CoreError::Rejected { status: 409, .. })
    ));
    assert_eq!(
        panel.view().form(),
        ("https://other.example".to_string(), "abc".to_string())
    );
    assert_eq!(panel.view().errors().len(), 1);
    assert_eq!(
        backend.mappings(),
        vec![Mapping::new("abc", "https://example.com")]
    );
}

#[tokio::test]
async fn delete_removes_row() {
    for variant in variants() {
        let backend = start(
            variant.clone(),
            vec![
                Mapping::new("one", "https://one.example"),
                Mapping::new("two", "https://two.example"),
            ],
        )
        .await;
        let panel = panel_for(&backend, backend.api_key()).await;
        panel.initialize().await.unwrap();

        let outcome = panel
            .dispatch(PanelEvent::Delete(ShortCode::new("one")))
            .await
            .unwrap();

        assert_eq!(outcome, Dispatch::Applied, "variant {variant}");
        assert_eq!(
            backend.mappings(),
            vec![Mapping::new("two", "https://two.example")]
        );
        let markup = panel.view().markup();
        assert!(!markup.contains("data-short-code=\"one\""));
        assert!(markup.contains("data-short-code=\"two\""));
    }
}

#[tokio::test]
async fn wrong_key_alerts_without_listing() {
    for variant in [ApiVariant::V1, ApiVariant::configurable("/admin/v1")] {
        let backend = start(
            variant.clone(),
            vec![Mapping::new("abc", "https://example.com")],
        )
        .await;
        let panel = panel_for(&backend, "wrong").await;

        assert_eq!(
            panel.initialize().await.unwrap(),
            InitOutcome::Unauthorized,
            "variant {variant}"
        );
        assert_eq!(panel.view().alerts(), vec![UNAUTHORIZED_ALERT.to_string()]);
        assert_eq!(backend.requests().len(), 1, "only the probe is sent");
        assert_eq!(panel.view().markup(), "");

        let outcome = panel.dispatch(panel.view().submit_event()).await.unwrap();
        assert_eq!(outcome, Dispatch::Ignored);
        assert!(backend.requests_with_method("POST").is_empty());
    }
}

#[tokio::test]
async fn missing_key_sends_nothing() {
    let backend = start(ApiVariant::V1, Vec::new()).await;
    let session = SessionConfig::from_page_url(&backend.origin(), ApiVariant::V1).unwrap();
    let client = HttpAdminClient::new(&backend.origin(), ApiVariant::V1, None).unwrap();
    let panel = AdminPanel::new(session, client, HtmlTableView::new());

    assert_eq!(panel.initialize().await.unwrap(), InitOutcome::MissingApiKey);
    assert!(backend.requests().is_empty());
    assert!(panel.view().alerts().is_empty());
}

#[tokio::test]
async fn teardown_stops_actions() {
    let backend = start(
        ApiVariant::V1,
        vec![Mapping::new("abc", "https://example.com")],
    )
    .await;
    let panel = panel_for(&backend, backend.api_key()).await;
    panel.initialize().await.unwrap();
    let before = backend.requests().len();

    panel.teardown();
    let outcome = panel
        .dispatch(PanelEvent::Delete(ShortCode::new("abc")))
        .await
        .unwrap();

    assert_eq!(outcome, Dispatch::Ignored);
    assert_eq!(backend.requests().len(), before);
    assert_eq!(backend.mappings().len(), 1);
}

#[tokio::test]
async fn access_logs_need_a_key_first() {
    let backend = start(ApiVariant::V1, vec![Mapping::new("abc", "https://example.com")]).await;
    let session = SessionConfig::from_page_url(&backend.origin(), ApiVariant::V1).unwrap();
    let client = HttpAdminClient::new(&backend.origin(), ApiVariant::V1, None).unwrap();
    let panel = AdminPanel::new(session, client, HtmlTableView::new());

    assert_eq!(panel.authenticate().await.unwrap(), InitOutcome::MissingApiKey);
    assert!(backend.requests().is_empty());

    let panel = panel_for(&backend, backend.api_key()).await;
    assert_eq!(panel.authenticate().await.unwrap(), InitOutcome::Active);
    let logs = panel.api().access_logs().await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].code.as_str(), "abc");
}
