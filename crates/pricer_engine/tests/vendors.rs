use pretty_assertions::assert_eq;
use pricer_core::CardResult;
use pricer_engine::vendors::{CernyRytir, Draco, ModraVevericka};
use pricer_engine::{FailureKind, VendorPages};

fn cerny_page(rows: &[(&str, &str, &str, &str)], total: Option<usize>) -> String {
    let mut html = String::from(
        "<html><head><title>Kusovky</title></head><body>\
         <table class=\"kusovkytext\"><tr><td>Hledat kartu</td></tr></table>",
    );
    if let Some(total) = total {
        html.push_str(&format!(
            "<span class=\"kusovkytext\">Nalezeno {total} karet</span>"
        ));
    }
    html.push_str("<table class=\"kusovkytext\"><tbody>");
    for (name, edition, card_type, price) in rows {
        html.push_str(&format!(
            "<tr><td colspan=\"3\"><div><font>{name}</font></div></td></tr>\
             <tr><td>{edition}</td><td></td><td></td></tr>\
             <tr><td>{card_type}</td><td>4 ks</td><td>{price}</td></tr>"
        ));
    }
    html.push_str("</tbody></table></body></html>");
    html
}

#[test]
fn cerny_rytir_reads_row_triples() {
    let vendor = CernyRytir::new("http://www.cernyrytir.cz/").unwrap();
    let html = cerny_page(
        &[
            ("Mountain", "Alpha", "Land", "12 Kč"),
            ("Goblin Mountaineer", "Mirage", "Creature - Goblin", "5 Kč"),
            ("Mountain", "Beta", "Land", "vyprodáno"),
        ],
        Some(45),
    );

    let page = vendor.parse_page(&html).unwrap();
    assert_eq!(page.total_results, Some(45));
    assert_eq!(
        page.candidates,
        vec![
            CardResult::new("Mountain", 12.0, "CZK")
                .with_edition("Alpha")
                .with_type("Land"),
            CardResult::new("Goblin Mountaineer", 5.0, "CZK")
                .with_edition("Mirage")
                .with_type("Creature - Goblin"),
        ]
    );
}

#[test]
fn cerny_rytir_without_results_table_is_empty() {
    let vendor = CernyRytir::new("http://www.cernyrytir.cz/").unwrap();
    let html = "<html><body><table class=\"kusovkytext\"><tr><td>Nic</td></tr></table></body></html>";
    let page = vendor.parse_page(html).unwrap();
    assert!(page.candidates.is_empty());
    assert_eq!(page.total_results, None);

    let err = vendor.parse_page("<html><body>maintenance</body></html>").unwrap_err();
    assert_eq!(err.kind, FailureKind::Parse);
}

#[test]
fn cerny_rytir_urls_page_by_offset() {
    let vendor = CernyRytir::new("http://www.cernyrytir.cz").unwrap();
    let url = vendor.page_url("Lightning Bolt", 3);
    assert_eq!(url.path(), "/index.php3");
    let query = url.query().unwrap();
    assert!(query.starts_with("akce=3&limit=60&jmenokarty=Lightning+Bolt&"));
    assert!(query.ends_with("submit=Vyhledej"));
    assert_eq!(vendor.identity().base_url(), "http://www.cernyrytir.cz/");
    assert_eq!(vendor.identity().currency(), "CZK");
}

#[test]
fn draco_reads_items_and_range_total() {
    let vendor = Draco::new("http://shop.dragonhost.eu/").unwrap();
    let html = "<html><body><div class=\"col-main\">\
        <div class=\"category-products\"><div class=\"toolbar\">\
          <p class=\"amount\">Položky 1 až 120 z celkem 130</p></div>\
        <ul class=\"products-grid\">\
          <li class=\"item\"><h2 class=\"product-name\"><a href=\"#\">Urza’s Saga</a></h2>\
              <div class=\"price-box\"><span class=\"price\">3,50 €</span></div></li>\
          <li class=\"item\"><h2 class=\"product-name\"><a href=\"#\">Urza's Saga</a></h2>\
              <div class=\"price-box\"><span class=\"price\">2,90 €</span></div></li>\
        </ul>\
        <div class=\"toolbar\"><p class=\"amount\">Položky 1 až 120 z celkem 130</p></div>\
        </div></div></body></html>";

    let page = vendor.parse_page(html).unwrap();
    assert_eq!(page.total_results, Some(130));
    assert_eq!(
        page.candidates,
        vec![
            CardResult::new("Urza's Saga", 3.5, "EUR"),
            CardResult::new("Urza's Saga", 2.9, "EUR"),
        ]
    );
}

#[test]
fn draco_single_number_total_and_missing_toolbar() {
    let vendor = Draco::new("http://shop.dragonhost.eu/").unwrap();
    let single = "<div class=\"col-main\"><div class=\"category-products\">\
        <p class=\"amount\">Položek: 19</p></div></div>";
    assert_eq!(vendor.parse_page(single).unwrap().total_results, Some(19));

    let none = "<div class=\"col-main\"><p class=\"note-msg\">Žádné výsledky.</p></div>";
    let page = vendor.parse_page(none).unwrap();
    assert_eq!(page.total_results, Some(0));
    assert!(page.candidates.is_empty());
}

#[test]
fn draco_urls_carry_page_number() {
    let vendor = Draco::new("http://shop.dragonhost.eu/").unwrap();
    let url = vendor.page_url("Fire // Ice", 2);
    assert_eq!(
        url.as_str(),
        "http://shop.dragonhost.eu/catalogsearch/result/index/?limit=120&p=2&q=Fire+%2F%2F+Ice"
    );
}

#[test]
fn modra_vevericka_reads_card_list() {
    let vendor = ModraVevericka::new("http://www.modravevericka.sk/").unwrap();
    let html = "<div id=\"card_list\">\
        <div class=\"card\"><div class=\"name\"><a>Dark Ritual</a></div><div class=\"price\">0,30 €</div></div>\
        <div class=\"card\"><div class=\"name\"><a>Dark Ritual</a></div><div class=\"price\">na dotaz</div></div>\
        </div>\
        <div class=\"card\"><div class=\"name\"><a>Outside</a></div><div class=\"price\">0,01 €</div></div>";

    let page = vendor.parse_page(html).unwrap();
    assert_eq!(page.candidates, vec![CardResult::new("Dark Ritual", 0.3, "EUR")]);
    assert_eq!(vendor.results_per_page(), None);

    let url = vendor.page_url("Dark Ritual", 1);
    assert_eq!(
        url.as_str(),
        "http://www.modravevericka.sk/x-cards,x-page-1-size-10000-order-name-asc.html?onclick=run_shopping_assistant&filter_name=Dark+Ritual"
    );
}
