//! Share links for visitor passes.

const WHATSAPP_BASE_URL: &str = "https://wa.me/?text=";

/// Text sent to a visitor together with their access code.
pub fn pass_message(visit_code: &str, visitor_name: &str) -> String {
    format!(
        "Hello, your access code to visit the condominium is: {visit_code}. \
         Please show it at the entrance. - {visitor_name}"
    )
}

/// A `wa.me` link that opens WhatsApp with the pass message pre-filled.
pub fn whatsapp_share_url(visit_code: &str, visitor_name: &str) -> String {
    let message = pass_message(visit_code, visitor_name);
    format!("{WHATSAPP_BASE_URL}{}", urlencoding::encode(&message))
}
