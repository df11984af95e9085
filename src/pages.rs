//! Server-rendered HTML interface under `/car-templ`.
//!
//! Plain HTML forms only: adds, edits and deletes are form posts answered
//! with a `303` back to the market page.

use std::fmt::Write as _;
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, warn};

use crate::api::sorted_listing;
use crate::car::{CarPatch, CarRecord, NewCar};
use crate::handler::with_state;
use crate::payload::{self, PayloadError};
use crate::sort::{SortField, SortOrder};
use crate::stats::{self, FieldStats, MILEAGE_DECIMALS, PRICE_DECIMALS, Statistics, YEAR_DECIMALS};
use crate::store::{CarStore, StoreError};
use crate::{IntoResponse, Request, Response, Router, Status};

const PREFIX: &str = "/car-templ";
const HOME: &str = "/car-templ/";

#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error("missing path parameter `id`")]
    MissingId,
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, title) = match &self {
            PageError::Store(StoreError::NotFound(_)) => (Status::NotFound, "Car not found"),
            PageError::Payload(_) => {
                warn!("rejected form: {self}");
                (Status::BadRequest, "Invalid car details")
            }
            PageError::Store(StoreError::LockPoisoned(_)) | PageError::MissingId => {
                error!("{self}");
                (Status::InternalServerError, "Something went wrong")
            }
        };
        let body = format!(
            "<h1>{title}</h1>\n<p>{}</p>\n<p><a href=\"{HOME}\">Back to the market</a></p>\n",
            escape(&self.to_string())
        );
        Response::builder().status(status).html(layout(title, &body))
    }
}

pub(crate) fn mount(router: Router, store: &Arc<CarStore>) -> Router {
    router
        .get(HOME, with_state(store, index))
        .post("/car-templ/cars", with_state(store, create))
        .get("/car-templ/cars/{id}", with_state(store, detail))
        .post("/car-templ/cars/{id}", with_state(store, update))
        .post("/car-templ/cars/{id}/delete", with_state(store, delete))
}

fn id(req: &Request) -> Result<&str, PageError> {
    req.param("id").ok_or(PageError::MissingId)
}

// GET /car-templ/?sort_by=brand&order=asc
async fn index(store: Arc<CarStore>, req: Request) -> Result<Response, PageError> {
    let cars = sorted_listing(&store, &req)?;
    let stats = stats::aggregate(&cars);
    let current = req
        .query("sort_by")
        .and_then(|f| f.parse::<SortField>().ok())
        .map(|f| (f, req.query("order").map(|o| SortOrder::parse(&o)).unwrap_or_default()));
    Ok(Response::html(layout("Car Market", &market_page(&cars, &stats, current))))
}

// GET /car-templ/cars/{id}
async fn detail(store: Arc<CarStore>, req: Request) -> Result<Response, PageError> {
    let car = store.get(id(&req)?)?;
    let title = format!("{} {}", car.brand, car.model);
    Ok(Response::html(layout(&title, &detail_page(&car))))
}

// POST /car-templ/cars
async fn create(store: Arc<CarStore>, req: Request) -> Result<Response, PageError> {
    let candidate: NewCar = payload::decode_form(req.body())?;
    store.insert(candidate)?;
    Ok(Response::redirect(HOME))
}

// POST /car-templ/cars/{id}
async fn update(store: Arc<CarStore>, req: Request) -> Result<Response, PageError> {
    let id = id(&req)?;
    store.get(id)?;
    let patch: CarPatch = payload::decode_form(req.body())?;
    store.update(id, patch)?;
    Ok(Response::redirect(HOME))
}

// POST /car-templ/cars/{id}/delete
async fn delete(store: Arc<CarStore>, req: Request) -> Result<Response, PageError> {
    store.delete(id(&req)?)?;
    Ok(Response::redirect(HOME))
}

// ── Rendering ─────────────────────────────────────────────────────────────────

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n</head>\n<body>\n{body}</body>\n</html>\n",
        escape(title)
    )
}

fn market_page(cars: &[CarRecord], stats: &Statistics, current: Option<(SortField, SortOrder)>) -> String {
    let mut html = String::from("<h1>Car Market</h1>\n");

    if cars.is_empty() {
        html.push_str("<p>No cars on the market.</p>\n");
    } else {
        html.push_str("<table>\n<thead><tr>");
        for field in SortField::ALL {
            // Clicking the active column flips its direction.
            let order = match current {
                Some((f, order)) if f == field => order.flip(),
                _ => SortOrder::Ascending,
            };
            let _ = write!(
                html,
                "<th><a href=\"{HOME}?sort_by={field}&amp;order={}\">{field}</a></th>",
                order.as_str()
            );
        }
        html.push_str("<th></th></tr></thead>\n<tbody>\n");
        for car in cars {
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
                 <td><a href=\"{PREFIX}/cars/{id}\">edit</a></td></tr>",
                escape(&car.brand),
                escape(&car.model),
                optional(car.year),
                number(car.price),
                optional(car.mileage),
                id = escape(&car.id),
            );
        }
        html.push_str("</tbody>\n</table>\n");
    }

    html.push_str(&stats_panel(stats));
    html.push_str("<h2>Add a car</h2>\n");
    html.push_str(&car_form(&format!("{PREFIX}/cars"), None, "Add"));
    html
}

fn stats_panel(stats: &Statistics) -> String {
    let mut html = String::from("<h2>Statistics</h2>\n");
    if let Statistics::NoData = stats {
        html.push_str("<p>No data.</p>\n");
        return html;
    }
    let _ = writeln!(html, "<p>{} cars listed.</p>", stats.total());
    html.push_str("<table>\n<tr><th></th><th>count</th><th>min</th><th>avg</th><th>max</th></tr>\n");
    let rows = [
        ("price", stats.price(), PRICE_DECIMALS),
        ("year", stats.year(), YEAR_DECIMALS),
        ("mileage", stats.mileage(), MILEAGE_DECIMALS),
    ];
    for (label, field, decimals) in rows {
        html.push_str(&stats_row(label, &field, decimals));
    }
    html.push_str("</table>\n");
    html
}

/// Min and max are raw values; the mean keeps the field's fixed decimals.
fn stats_row(label: &str, field: &FieldStats, decimals: usize) -> String {
    let missing = || "n/a".to_owned();
    format!(
        "<tr><th>{label}</th><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        field.count,
        field.min.map(number).unwrap_or_else(missing),
        field.avg.map(|avg| format!("{avg:.decimals$}")).unwrap_or_else(missing),
        field.max.map(number).unwrap_or_else(missing),
    )
}

fn detail_page(car: &CarRecord) -> String {
    let mut html = format!(
        "<h1>{} {}</h1>\n<p>Listing #{}</p>\n",
        escape(&car.brand),
        escape(&car.model),
        escape(&car.id)
    );
    let action = format!("{PREFIX}/cars/{}", escape(&car.id));
    html.push_str(&car_form(&action, Some(car), "Save"));
    let _ = writeln!(
        html,
        "<form method=\"post\" action=\"{action}/delete\"><button type=\"submit\">Delete</button></form>"
    );
    let _ = writeln!(html, "<p><a href=\"{HOME}\">Back to the market</a></p>");
    html
}

fn car_form(action: &str, car: Option<&CarRecord>, submit: &str) -> String {
    let fields = [
        ("brand", "text", car.map(|c| escape(&c.brand)), true),
        ("model", "text", car.map(|c| escape(&c.model)), true),
        ("year", "number", car.map(|c| optional(c.year)), false),
        ("price", "number", car.map(|c| number(c.price)), true),
        ("mileage", "number", car.map(|c| optional(c.mileage)), false),
    ];

    let mut html = format!("<form method=\"post\" action=\"{action}\">\n");
    for (name, kind, value, required) in fields {
        let value = value.unwrap_or_default();
        let _ = writeln!(
            html,
            "<label>{name} <input type=\"{kind}\" name=\"{name}\" value=\"{value}\"{}{}></label>",
            if kind == "number" { " step=\"any\"" } else { "" },
            if required { " required" } else { "" },
        );
    }
    let _ = writeln!(html, "<button type=\"submit\">{submit}</button>\n</form>");
    html
}

fn optional(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Whole numbers print without decimals, everything else with two.
fn number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<b>"A&B"</b>"#), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
    }

    #[test]
    fn numbers_drop_trailing_zero_decimals() {
        assert_eq!(number(25000.0), "25000");
        assert_eq!(number(2019.5), "2019.50");
    }

    #[test]
    fn active_column_link_flips_direction() {
        let html = market_page(
            &[],
            &Statistics::NoData,
            Some((SortField::Price, SortOrder::Ascending)),
        );
        // Headers are only rendered when there is something to sort.
        assert!(html.contains("No cars on the market."));
        assert!(html.contains("No data."));

        let car = CarRecord {
            id: "1".into(),
            brand: "Lada".into(),
            model: "Niva".into(),
            year: None,
            price: 3500.0,
            mileage: None,
        };
        let cars = [car];
        let html = market_page(
            &cars,
            &stats::aggregate(&cars),
            Some((SortField::Price, SortOrder::Ascending)),
        );
        assert!(html.contains("sort_by=price&amp;order=desc"));
        assert!(html.contains("sort_by=brand&amp;order=asc"));
    }

    #[test]
    fn stats_means_use_the_field_precision() {
        let car = |price: f64, year: i64| CarRecord {
            id: "1".into(),
            brand: "b".into(),
            model: "m".into(),
            year: Some(year),
            price,
            mileage: None,
        };
        let html = stats_panel(&stats::aggregate(&[car(25000.0, 2020), car(45000.0, 2019)]));
        assert!(html.contains("<th>price</th><td>2</td><td>25000</td><td>35000.00</td><td>45000</td>"));
        assert!(html.contains("<th>year</th><td>2</td><td>2019</td><td>2019.5</td><td>2020</td>"));
        assert!(html.contains("<th>mileage</th><td>0</td><td>n/a</td><td>n/a</td><td>n/a</td>"));
    }
}
