use crate::config::TrackerConfig;
use crate::error::{CorreiosError, Result};
use crate::types::{Order, TrackingCode, BATCH_DELIMITER};
use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, REFERER};
use scraper::{ElementRef, Html, Selector};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Results container on the carrier's page.
const CONTENT_SELECTOR: &str = ".ctrlcontent";
const ROW_SELECTOR: &str = "tbody tr";
const CELL_SELECTOR: &str = "td";

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// Blocking client for the carrier's status form. Every call sends exactly
/// one request, whatever the number of codes.
pub struct Tracker {
    client: Client,
    config: TrackerConfig,
}

impl Tracker {
    pub fn new(config: TrackerConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn fetch_statuses(&self, codes: &[TrackingCode]) -> Result<Vec<Order>> {
        if codes.is_empty() {
            return Err(CorreiosError::EmptyBatch);
        }

        let params = form_params(codes);
        tracing::debug!(
            endpoint = %self.config.endpoint,
            codes = codes.len(),
            "requesting carrier status"
        );

        let body = self
            .client
            .post(&self.config.endpoint)
            .header(REFERER, &self.config.referer)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .form(&params)
            .send()?
            .error_for_status()?
            .text()?;

        let orders = parse_orders(&body)?;
        tracing::debug!(rows = orders.len(), "parsed carrier response");
        Ok(orders)
    }
}

/// `objetos` carries the whole batch; a lone code also needs the language and
/// query-type fields the single-object form sends.
fn form_params(codes: &[TrackingCode]) -> Vec<(&'static str, String)> {
    let delimiter = BATCH_DELIMITER.to_string();
    let joined = codes
        .iter()
        .map(TrackingCode::as_str)
        .collect::<Vec<_>>()
        .join(delimiter.as_str());

    let mut params = vec![("objetos", joined)];
    if codes.len() == 1 {
        params.push(("P_LINGUA", "001".to_string()));
        params.push(("P_TIPO", "001".to_string()));
    }
    params
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Extract `(id, status, date)` rows from the carrier's results page, in
/// document order. A page without the results container yields no orders.
pub fn parse_orders(html: &str) -> Result<Vec<Order>> {
    let content_sel = selector(CONTENT_SELECTOR)?;
    let row_sel = selector(ROW_SELECTOR)?;
    let cell_sel = selector(CELL_SELECTOR)?;

    let doc = Html::parse_document(html);
    let Some(content) = doc.select(&content_sel).next() else {
        return Ok(Vec::new());
    };

    let mut orders = Vec::new();
    for (i, row) in content.select(&row_sel).enumerate() {
        let cells: Vec<String> = row.select(&cell_sel).map(cell_text).collect();
        match cells.as_slice() {
            [] => continue,
            [id, status, date, ..] => orders.push(Order {
                id: id.clone(),
                status: status.clone(),
                date: date.clone(),
            }),
            short => {
                return Err(CorreiosError::Parse(format!(
                    "row {} has {} cells, expected at least 3",
                    i + 1,
                    short.len()
                )))
            }
        }
    }
    Ok(orders)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| CorreiosError::Parse(format!("bad selector '{css}': {e:?}")))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    let raw: String = cell.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::time::Duration;

    const RESULTS_PAGE: &str = r##"<html><body>
<div class="header">menu</div>
<div class="ctrlcontent">
  <table class="listEvent">
    <thead><tr><th>Objeto</th><th>Situação</th><th>Data</th></tr></thead>
    <tbody>
      <tr>
        <td><a href="#">AA123456789BR</a></td>
        <td>
          <strong>Entregue</strong>
        </td>
        <td>01/02/2020 10:31</td>
      </tr>
      <tr>
        <td>BB987654321BR</td>
        <td>Postado</td>
        <td>28/01/2020</td>
      </tr>
      <tr>
        <td>AA123456789BR</td>
        <td>Saiu para entrega</td>
        <td>31/01/2020</td>
      </tr>
    </tbody>
  </table>
</div>
</body></html>"##;

    fn code(s: &str) -> TrackingCode {
        TrackingCode::parse(s).unwrap()
    }

    fn tracker_for(server: &mockito::ServerGuard) -> Tracker {
        let config = TrackerConfig::default()
            .with_endpoint(format!("{}/multResultado.cfm", server.url()))
            .with_timeout(Duration::from_secs(5));
        Tracker::new(config).unwrap()
    }

    #[test]
    fn parses_rows_in_document_order() {
        let orders = parse_orders(RESULTS_PAGE).unwrap();
        assert_eq!(orders.len(), 3);
        assert_eq!(
            orders[0],
            Order {
                id: "AA123456789BR".into(),
                status: "Entregue".into(),
                date: "01/02/2020 10:31".into(),
            }
        );
        assert_eq!(orders[1].id, "BB987654321BR");
        // repeated ids are kept, not merged
        assert_eq!(orders[2].id, "AA123456789BR");
        assert_eq!(orders[2].status, "Saiu para entrega");
    }

    #[test]
    fn missing_container_is_empty_not_error() {
        let html = "<html><body><p>Objeto não encontrado</p></body></html>";
        assert!(parse_orders(html).unwrap().is_empty());
    }

    #[test]
    fn container_without_rows_is_empty() {
        let html = r#"<div class="ctrlcontent"><p>Nenhum resultado</p></div>"#;
        assert!(parse_orders(html).unwrap().is_empty());
    }

    #[test]
    fn only_first_container_is_read() {
        let html = r#"
            <div class="ctrlcontent"><table><tr><td>AA123456789BR</td><td>Postado</td><td>d1</td></tr></table></div>
            <div class="ctrlcontent"><table><tr><td>BB987654321BR</td><td>Postado</td><td>d2</td></tr></table></div>"#;
        let orders = parse_orders(html).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, "AA123456789BR");
    }

    #[test]
    fn short_row_is_parse_error() {
        let html = r#"<div class="ctrlcontent"><table><tbody>
            <tr><td>AA123456789BR</td><td>Postado</td></tr>
        </tbody></table></div>"#;
        let err = parse_orders(html).unwrap_err();
        assert!(matches!(err, CorreiosError::Parse(_)));
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn single_code_sends_form_extras() {
        let params = form_params(&[code("AA123456789BR")]);
        assert_eq!(
            params,
            vec![
                ("objetos", "AA123456789BR".to_string()),
                ("P_LINGUA", "001".to_string()),
                ("P_TIPO", "001".to_string()),
            ]
        );
    }

    #[test]
    fn batch_sends_one_joined_field() {
        let params = form_params(&[code("AA123456789BR"), code("BB987654321BR")]);
        assert_eq!(
            params,
            vec![("objetos", "AA123456789BR;BB987654321BR".to_string())]
        );
    }

    #[test]
    fn empty_batch_is_rejected_before_io() {
        let config = TrackerConfig::default().with_endpoint("http://127.0.0.1:1/");
        let tracker = Tracker::new(config).unwrap();
        assert!(matches!(
            tracker.fetch_statuses(&[]),
            Err(CorreiosError::EmptyBatch)
        ));
    }

    #[test]
    fn batch_is_one_request() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/multResultado.cfm")
            .match_header("referer", "http://www.correios.com.br/para-voce")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::Exact(
                "objetos=AA123456789BR%3BBB987654321BR".to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(RESULTS_PAGE)
            .expect(1)
            .create();

        let tracker = tracker_for(&server);
        let orders = tracker
            .fetch_statuses(&[code("AA123456789BR"), code("BB987654321BR")])
            .unwrap();

        mock.assert();
        assert_eq!(orders.len(), 3);
    }

    #[test]
    fn single_code_request_carries_extra_fields() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/multResultado.cfm")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("objetos".into(), "AA123456789BR".into()),
                Matcher::UrlEncoded("P_LINGUA".into(), "001".into()),
                Matcher::UrlEncoded("P_TIPO".into(), "001".into()),
            ]))
            .with_body("<html><body></body></html>")
            .create();

        let orders = tracker_for(&server)
            .fetch_statuses(&[code("AA123456789BR")])
            .unwrap();

        mock.assert();
        assert!(orders.is_empty());
    }

    #[test]
    fn latin1_page_is_decoded() {
        let mut server = mockito::Server::new();
        let mut page = b"<div class=\"ctrlcontent\"><table><tr><td>AA123456789BR</td><td>Objeto entregue ao destinat".to_vec();
        page.push(0xE1); // 'á' in ISO-8859-1
        page.extend_from_slice(b"rio</td><td>01/02/2020</td></tr></table></div>");
        let _mock = server
            .mock("POST", "/multResultado.cfm")
            .with_header("content-type", "text/html; charset=ISO-8859-1")
            .with_body(page)
            .create();

        let orders = tracker_for(&server)
            .fetch_statuses(&[code("AA123456789BR")])
            .unwrap();
        assert_eq!(orders[0].status, "Objeto entregue ao destinatário");
    }

    #[test]
    fn server_error_is_network_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/multResultado.cfm")
            .with_status(503)
            .create();

        let err = tracker_for(&server)
            .fetch_statuses(&[code("AA123456789BR")])
            .unwrap_err();
        assert!(matches!(err, CorreiosError::Network(_)));
    }

    #[test]
    fn connection_refused_is_network_error() {
        let config = TrackerConfig::default()
            .with_endpoint("http://127.0.0.1:1/multResultado.cfm")
            .with_timeout(Duration::from_secs(2));
        let err = Tracker::new(config)
            .unwrap()
            .fetch_statuses(&[code("AA123456789BR")])
            .unwrap_err();
        assert!(matches!(err, CorreiosError::Network(_)));
    }

    #[test]
    fn malformed_page_is_recoverable() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/multResultado.cfm")
            .with_body(r#"<div class="ctrlcontent"><table><tr><td>only one</td></tr></table></div>"#)
            .create();

        let err = tracker_for(&server)
            .fetch_statuses(&[code("AA123456789BR")])
            .unwrap_err();
        assert!(matches!(err, CorreiosError::Parse(_)));
    }
}
