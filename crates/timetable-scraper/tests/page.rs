//! End-to-end tests for `split_page`: portal markup in, courses out, with the
//! campus map fallback served by `wiremock`.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use timetable_core::Day;
use timetable_scraper::{
    split_page, ExtractError, FragmentKind, GeodataCache, GeodataResolver, MapSearchClient,
};

fn test_client(base_url: &str) -> MapSearchClient {
    MapSearchClient::with_base_url(5, "timetable-test/0.1", base_url)
        .expect("failed to build test MapSearchClient")
}

fn seeded_cache() -> GeodataCache {
    serde_json::from_value(json!({
        "items": [
            { "id": 11414, "point": { "latitude": "-35.2752", "longitude": "149.1196" } },
            { "id": 20, "related_points": [99] }
        ],
        "points": { "99": { "latitude": "-35.2781", "longitude": "149.1207" } }
    }))
    .expect("valid geodata fixture")
}

fn header(title: &str, code: &str, dates: &str) -> String {
    format!(
        "<div data-role=\"collapsible\">\
         <h3>{title} (Class: LecA, TutA)</h3>\
         <p><a href=\"#{code}\">{code}</a></p>\
         <h3 class=\"date-info-display\">\n    {dates}\n  </h3>\
         </div>"
    )
}

fn row(name: &str, day: &str, location_cell: &str) -> String {
    format!(
        "<tr>\
         <td><a href=\"#detail\">{name}</a></td>\
         <td>{day}</td>\
         <td>09:00</td>\
         <td>10:00</td>\
         <td>1:00</td>\
         <td><a href=\"#weeks\"> 1-12 </a></td>\
         <td>Staff</td>\
         <td>{location_cell}</td>\
         </tr>"
    )
}

fn table(rows: &[String]) -> String {
    format!("<table><tbody>{}</tbody></table>", rows.concat())
}

fn page(fragments: &[String]) -> String {
    format!(
        "<!DOCTYPE html><html><body><div id=\"content\">{}</div></body></html>",
        fragments.concat()
    )
}

fn search_page(lat: f64, lng: f64) -> String {
    format!(
        "<html><head><script type=\"application/json\" \
         data-drupal-selector=\"drupal-settings-json\">{}</script></head></html>",
        json!({ "pois": [{ "lat": lat, "lng": lng }] })
    )
}

#[tokio::test]
async fn split_page_extracts_courses_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/maps"))
        .and(query_param("search", "Physics Lab 1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(search_page(-35.1, 149.2)))
        .expect(1)
        .mount(&server)
        .await;

    let html = page(&[
        header("Programming as Problem Solving", "COMP1100_S1_(2)", "20 Feb - 26 May"),
        table(&[
            row(
                "COMP1100_S1_(2)-LecA/01",
                "Monday",
                "<a href=\"http://www.anu.edu.au/maps#show=11414\">Manning Clark Hub</a>",
            ),
            row(
                "COMP1100_S1_(2)-TutA/02",
                "Thursday",
                "<a href=\"http://www.anu.edu.au/maps#show=20\">CSIT N113</a>; \
                 <a href=\"http://www.anu.edu.au/maps#show=21\">CSIT N114</a>",
            ),
        ]),
        header("Physics I", "PHYS1101_S1", "20 Feb - 26 May"),
        table(&[
            row(
                "PHYS1101_S1-Lab/03",
                "Sunday",
                "<a href=\"http://www.anu.edu.au/maps#show=5150\">Physics Lab 1</a>",
            ),
            row("PHYS1101_S1-Wrk", "Funday", "Online"),
        ]),
    ]);

    let client = test_client(&server.uri());
    let mut cache = seeded_cache();
    let mut resolver = GeodataResolver::new(&mut cache, &client);

    let courses = split_page(&html, &mut resolver)
        .await
        .expect("page should parse");
    let stats = resolver.stats();

    assert_eq!(courses.len(), 2);

    let comp = &courses[0];
    assert_eq!(comp.title, "Programming as Problem Solving");
    assert_eq!(comp.id, "COMP1100_S1");
    assert_eq!(comp.link, "#COMP1100_S1_(2)");
    assert_eq!(comp.dates, "20 Feb - 26 May");
    assert_eq!(comp.lessons.len(), 2);

    let lec = &comp.lessons[0];
    assert_eq!(lec.name, "COMP1100_S1-LecA/01");
    assert_eq!(lec.day, Day::Index(0));
    assert_eq!(lec.activity, "LecA");
    assert_eq!(lec.occurrence, "01");
    assert_eq!(lec.weeks, "1-12");
    assert_eq!(lec.lat.as_deref(), Some("-35.2752"));
    assert_eq!(lec.lon.as_deref(), Some("149.1196"));

    let tut = &comp.lessons[1];
    assert_eq!(tut.location, "CSIT N113; CSIT N114");
    assert_eq!(tut.location_id, "http://www.anu.edu.au/maps#show=20");
    assert_eq!(tut.lat.as_deref(), Some("-35.2781"));

    let phys = &courses[1];
    let lab = &phys.lessons[0];
    assert_eq!(lab.day, Day::Index(6));
    assert_eq!(lab.lat.as_deref(), Some("-35.1"));
    assert_eq!(lab.lon.as_deref(), Some("149.2"));

    let workshop = &phys.lessons[1];
    assert_eq!(workshop.day, Day::NotFound);
    assert_eq!(workshop.activity, "Wrk");
    assert_eq!(workshop.location, "Online");
    assert_eq!(workshop.location_id, "");
    assert!(workshop.lat.is_none());

    assert_eq!(stats.cache_hits, 2);
    assert_eq!(stats.remote_hits, 1);
    assert_eq!(stats.failures, 0);
    assert_eq!(cache.items.len(), 3);
    assert_eq!(cache.items[2].id, 5150);
}

#[tokio::test]
async fn split_page_geocode_failure_keeps_lesson() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let html = page(&[
        header("Physics I", "PHYS1101_S1", "S1"),
        table(&[row(
            "PHYS1101_S1-Lab/03",
            "Monday",
            "<a href=\"http://www.anu.edu.au/maps#show=5150\">Physics Lab 1</a>",
        )]),
    ]);

    let client = test_client(&server.uri());
    let mut cache = GeodataCache::default();
    let mut resolver = GeodataResolver::new(&mut cache, &client);

    let courses = split_page(&html, &mut resolver).await.unwrap();

    let lab = &courses[0].lessons[0];
    assert_eq!(lab.location, "Physics Lab 1");
    assert!(lab.lat.is_none() && lab.lon.is_none());
    assert!(cache.items.is_empty());
}

#[tokio::test]
async fn split_page_empty_table_yields_course_without_lessons() {
    let client = test_client("http://127.0.0.1:9");
    let mut cache = GeodataCache::default();
    let mut resolver = GeodataResolver::new(&mut cache, &client);

    let html = page(&[header("Physics I", "PHYS1101_S1", "S1"), table(&[])]);
    let courses = split_page(&html, &mut resolver).await.unwrap();

    assert_eq!(courses.len(), 1);
    assert!(courses[0].lessons.is_empty());
}

#[tokio::test]
async fn split_page_without_layout_is_structural_error() {
    let client = test_client("http://127.0.0.1:9");
    let mut cache = GeodataCache::default();
    let mut resolver = GeodataResolver::new(&mut cache, &client);

    let html = "<html><body><form id=\"login\">Session expired</form></body></html>";
    let err = split_page(html, &mut resolver).await.unwrap_err();

    assert!(
        matches!(err, ExtractError::Structural { headers: 0, tables: 0, .. }),
        "expected Structural, got: {err:?}"
    );
    assert!(err.markup().unwrap().contains("Session expired"));
}

#[tokio::test]
async fn split_page_with_headers_only_is_structural_error() {
    let client = test_client("http://127.0.0.1:9");
    let mut cache = GeodataCache::default();
    let mut resolver = GeodataResolver::new(&mut cache, &client);

    let html = page(&[header("Physics I", "PHYS1101_S1", "S1")]);
    let err = split_page(&html, &mut resolver).await.unwrap_err();

    assert!(matches!(
        err,
        ExtractError::Structural {
            headers: 1,
            tables: 0,
            ..
        }
    ));
}

#[tokio::test]
async fn split_page_with_unpaired_header_aborts_page() {
    let client = test_client("http://127.0.0.1:9");
    let mut cache = GeodataCache::default();
    let mut resolver = GeodataResolver::new(&mut cache, &client);

    let html = page(&[
        header("Physics I", "PHYS1101_S1", "S1"),
        table(&[]),
        header("Physics II", "PHYS1201_S1", "S1"),
    ]);
    let err = split_page(&html, &mut resolver).await.unwrap_err();

    assert!(
        matches!(
            err,
            ExtractError::UnpairedFragment {
                index: 1,
                missing: FragmentKind::Table
            }
        ),
        "expected UnpairedFragment, got: {err:?}"
    );
}

#[tokio::test]
async fn split_page_malformed_row_fails_course_with_context() {
    let client = test_client("http://127.0.0.1:9");
    let mut cache = GeodataCache::default();
    let mut resolver = GeodataResolver::new(&mut cache, &client);

    let html = page(&[
        header("Physics I", "PHYS1101_S1", "S1"),
        table(&[
            row("PHYS1101_S1-Lec", "Monday", "Online"),
            "<tr><td>PHYS1101_S1-Tut</td><td>Tuesday</td></tr>".to_owned(),
        ]),
    ]);
    let err = split_page(&html, &mut resolver).await.unwrap_err();

    match err {
        ExtractError::Row {
            course,
            row_index,
            row_markup,
            source,
        } => {
            assert_eq!(course, "Physics I -- S1");
            assert_eq!(row_index, 1);
            assert!(row_markup.contains("PHYS1101_S1-Tut"));
            assert!(source.reason.contains("at least 8 cells"));
        }
        other => panic!("expected Row error, got: {other:?}"),
    }
}
