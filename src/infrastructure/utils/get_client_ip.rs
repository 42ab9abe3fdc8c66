use actix_web::HttpRequest;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Extract the client's IP address from the request.
/// `trust_x_forwarded_for`: whether to trust the X-Forwarded-For header
/// (only behind a proxy that strips client-supplied values).
pub fn get_client_ip(req: &HttpRequest, trust_x_forwarded_for: bool) -> String {
    if trust_x_forwarded_for {
        let forwarded = req
            .headers()
            .get(FORWARDED_FOR)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(|value| value.trim().to_string());
        if let Some(ip) = forwarded {
            return ip;
        }
    }

    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
