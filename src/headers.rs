use http_client::Request;

/// User agent sent with every request
const USER_AGENT: &str = concat!("antirecommender/", env!("CARGO_PKG_VERSION"));

/// Add headers shared by all requests
pub fn add_common_headers(request: &mut Request) {
    let _ = request.insert_header("User-Agent", USER_AGENT);
    let _ = request.insert_header("Accept-Language", "en-US,en;q=0.9");
}

/// Add headers for JSON requests to the backend
pub fn add_json_headers(request: &mut Request) {
    add_common_headers(request);
    let _ = request.insert_header("Accept", "application/json");
    let _ = request.insert_header("Content-Type", "application/json");
}

/// Add headers for form posts to the music service's token endpoint
pub fn add_form_headers(request: &mut Request) {
    add_common_headers(request);
    let _ = request.insert_header("Accept", "application/json");
    let _ = request.insert_header("Content-Type", "application/x-www-form-urlencoded");
}

/// URL-encode form fields, preserving their order
pub fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
