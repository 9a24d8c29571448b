//! End-to-end tests for [`NominatimGeocoder`] against a local HTTP listener.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use geo::Coord;
use rstest::rstest;
use shelter_core::{GeocodeError, GeocodeQuery, Geocoder};
use shelter_data::geocoding::{NominatimConfig, NominatimGeocoder};

/// Serve a single canned HTTP response and return the request line received.
fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
    let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept connection");
        let request_line = read_request(&stream);
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        let mut stream = stream;
        stream
            .write_all(response.as_bytes())
            .expect("write response");
        request_line
    });
    (base_url, handle)
}

fn read_request(stream: &TcpStream) -> String {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).expect("read request line");
    loop {
        let mut header = String::new();
        let read = reader.read_line(&mut header).expect("read header");
        if read == 0 || header == "\r\n" {
            break;
        }
    }
    request_line
}

fn geocoder(base_url: &str) -> NominatimGeocoder {
    NominatimGeocoder::with_config(
        NominatimConfig::new(base_url).with_timeout(Duration::from_secs(2)),
    )
    .expect("geocoder should build")
}

#[rstest]
fn resolves_first_result() {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"[{"lat":"33.7701","lon":"-118.1937","display_name":"Pacific Avenue","address":{"postcode":"90802"}}]"#,
    );

    let place = geocoder(&base_url)
        .geocode(
            &GeocodeQuery::new("Pacific Avenue, Long Beach")
                .with_country_codes("us")
                .with_address_details(),
        )
        .expect("request should succeed")
        .expect("a place should be returned");

    assert_eq!(place.location, Coord { x: -118.1937, y: 33.7701 });
    assert_eq!(place.postcode.as_deref(), Some("90802"));
    let request_line = server.join().expect("server thread");
    assert!(
        request_line.starts_with(
            "GET /search?q=Pacific+Avenue%2C+Long+Beach&format=jsonv2&limit=1&addressdetails=1&countrycodes=us "
        ),
        "unexpected request: {request_line}"
    );
}

#[rstest]
fn contact_email_is_sent_with_the_search() {
    let (base_url, server) = serve_once("200 OK", "[]");

    let result = NominatimGeocoder::with_config(
        NominatimConfig::new(base_url)
            .with_timeout(Duration::from_secs(2))
            .with_email("ops@shelters.test"),
    )
    .expect("geocoder should build")
    .geocode(&GeocodeQuery::new("Pine Ave"));

    assert_eq!(result, Ok(None));
    let request_line = server.join().expect("server thread");
    assert!(
        request_line.starts_with(
            "GET /search?q=Pine+Ave&format=jsonv2&limit=1&addressdetails=0&email=ops%40shelters.test "
        ),
        "unexpected request: {request_line}"
    );
}

#[rstest]
#[case::latitude(r#"[{"lat":"95.0","lon":"-118.0","display_name":"Beyond the pole"}]"#)]
#[case::longitude(r#"[{"lat":"33.77","lon":"-200.0","display_name":"Off the map"}]"#)]
fn out_of_range_coordinates_map_to_parse_error(#[case] body: &'static str) {
    let (base_url, server) = serve_once("200 OK", body);

    let err = geocoder(&base_url)
        .geocode(&GeocodeQuery::new("Pine Ave"))
        .expect_err("coordinates should be rejected");

    assert!(matches!(err, GeocodeError::ParseError { .. }), "{err:?}");
    server.join().expect("server thread");
}

#[rstest]
fn empty_result_is_not_found() {
    let (base_url, server) = serve_once("200 OK", "[]");

    let result = geocoder(&base_url).geocode(&GeocodeQuery::new("Nowhere Rd"));

    assert_eq!(result, Ok(None));
    server.join().expect("server thread");
}

#[rstest]
fn server_error_maps_to_http_error() {
    let (base_url, server) = serve_once("503 Service Unavailable", "[]");

    let err = geocoder(&base_url)
        .geocode(&GeocodeQuery::new("Pine Ave"))
        .expect_err("request should fail");

    assert!(
        matches!(err, GeocodeError::HttpError { status: 503, .. }),
        "{err:?}"
    );
    server.join().expect("server thread");
}

#[rstest]
fn malformed_body_maps_to_parse_error() {
    let (base_url, server) = serve_once("200 OK", r#"{"error":"oops"}"#);

    let err = geocoder(&base_url)
        .geocode(&GeocodeQuery::new("Pine Ave"))
        .expect_err("body should not parse");

    assert!(matches!(err, GeocodeError::ParseError { .. }), "{err:?}");
    server.join().expect("server thread");
}

#[rstest]
fn refused_connection_maps_to_network_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
        listener.local_addr().expect("local addr").port()
    };

    let err = geocoder(&format!("http://127.0.0.1:{port}"))
        .geocode(&GeocodeQuery::new("Pine Ave"))
        .expect_err("nothing is listening");

    assert!(matches!(err, GeocodeError::NetworkError { .. }), "{err:?}");
}

#[rstest]
fn silent_server_maps_to_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
    let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept connection");
        thread::sleep(Duration::from_secs(3));
        drop(stream);
    });

    let err = NominatimGeocoder::with_config(
        NominatimConfig::new(base_url).with_timeout(Duration::from_millis(300)),
    )
    .expect("geocoder should build")
    .geocode(&GeocodeQuery::new("Pine Ave"))
    .expect_err("request should time out");

    assert!(matches!(err, GeocodeError::Timeout { .. }), "{err:?}");
    server.join().expect("server thread");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn works_from_the_blocking_pool_of_a_multi_threaded_runtime() {
    let (base_url, server) = serve_once("200 OK", "[]");

    let result = tokio::task::spawn_blocking(move || {
        geocoder(&base_url).geocode(&GeocodeQuery::new("Pine Ave"))
    })
    .await
    .expect("blocking task should finish");

    assert_eq!(result, Ok(None));
    server.join().expect("server thread");
}
