use pretty_assertions::assert_eq;
use pricer_core::{CardResult, SearchOutcome};
use pricer_engine::vendors::{CernyRytir, Draco};
use pricer_engine::{FailureKind, FetchSettings, PriceSource, ScrapedSource};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn cerny_page(rows: &[(&str, &str)], total: usize) -> String {
    let mut html = format!(
        "<html><body><table class=\"kusovkytext\"><tr><td>form</td></tr></table>\
         <span class=\"kusovkytext\">Nalezeno {total} karet</span>\
         <table class=\"kusovkytext\"><tbody>"
    );
    for (name, price) in rows {
        html.push_str(&format!(
            "<tr><td><div><font>{name}</font></div></td></tr>\
             <tr><td>Revised</td></tr>\
             <tr><td>Land</td><td>1 ks</td><td>{price}</td></tr>"
        ));
    }
    html.push_str("</tbody></table></body></html>");
    html
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

#[tokio::test]
async fn pages_are_followed_and_cheapest_exact_match_wins() {
    pricer_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/index.php3"))
        .and(query_param("limit", "0"))
        .and(query_param("jmenokarty", "Mountain"))
        .respond_with(html_response(cerny_page(
            &[("Goblin Mountaineer", "2 Kč"), ("Mountain", "8 Kč")],
            31,
        )))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/index.php3"))
        .and(query_param("limit", "30"))
        .respond_with(html_response(cerny_page(&[("Mountain", "5 Kč")], 31)))
        .expect(2)
        .mount(&server)
        .await;

    let source = ScrapedSource::new(
        CernyRytir::new(&server.uri()).unwrap(),
        FetchSettings::default(),
    );
    let candidates = source.fetch_candidates("Mountain").await.unwrap();
    assert_eq!(candidates.len(), 3);

    let outcome = source.find_cheapest("  Mountain ").await.unwrap();
    assert_eq!(
        outcome,
        SearchOutcome::Found(
            CardResult::new("Mountain", 5.0, "CZK")
                .with_edition("Revised")
                .with_type("Land")
        )
    );
}

#[tokio::test]
async fn only_partial_matches_mean_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/index.php3"))
        .respond_with(html_response(cerny_page(
            &[("Goblin Mountaineer", "2 Kč")],
            1,
        )))
        .mount(&server)
        .await;

    let source = ScrapedSource::new(
        CernyRytir::new(&server.uri()).unwrap(),
        FetchSettings::default(),
    );
    let outcome = source.find_cheapest("Mountain").await.unwrap();
    assert_eq!(outcome, SearchOutcome::NotFound);
}

#[tokio::test]
async fn empty_draco_search_fetches_a_single_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/catalogsearch/result/index/"))
        .and(query_param("p", "1"))
        .respond_with(html_response(
            "<div class=\"col-main\"><p class=\"note-msg\">Nic</p></div>".to_string(),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let source = ScrapedSource::new(Draco::new(&server.uri()).unwrap(), FetchSettings::default());
    assert!(source.fetch_candidates("Black Lotus").await.unwrap().is_empty());
}

#[tokio::test]
async fn http_errors_become_source_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let source = ScrapedSource::new(
        CernyRytir::new(&server.uri()).unwrap(),
        FetchSettings::default(),
    );
    let err = source.find_cheapest("Mountain").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn non_html_responses_are_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;

    let source = ScrapedSource::new(Draco::new(&server.uri()).unwrap(), FetchSettings::default());
    let err = source.fetch_candidates("Mountain").await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::UnsupportedContentType {
            content_type: "application/json".to_string()
        }
    );
}

#[tokio::test]
async fn oversized_pages_are_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html_response("x".repeat(2048)))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 1024,
        ..FetchSettings::default()
    };
    let source = ScrapedSource::new(Draco::new(&server.uri()).unwrap(), settings);
    let err = source.fetch_candidates("Mountain").await.unwrap_err();
    assert!(matches!(err.kind, FailureKind::TooLarge { max_bytes: 1024, .. }));
}

#[test]
fn search_url_uses_normalized_name() {
    let source = ScrapedSource::new(
        CernyRytir::new("http://www.cernyrytir.cz/").unwrap(),
        FetchSettings::default(),
    );
    let url = source.search_url("Urza’s   Saga");
    assert!(url
        .as_str()
        .starts_with("http://www.cernyrytir.cz/index.php3?akce=3&limit=0&jmenokarty=Urza%27s+Saga&"));
}
