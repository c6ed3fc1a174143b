/// Static knowledge base behind the assistant: contact channels, rental
/// conditions, and the standing site copy. All customer-facing text is
/// French, matching the site's audience.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KnowledgeBase {
    pub site_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub whatsapp_number: String,
    pub address: String,
    pub opening_hours: String,
    pub minimum_age: u8,
    pub minimum_license_years: u8,
    pub accepted_documents: String,
    pub payment_methods: String,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self {
            site_name: "Rentora".to_string(),
            contact_phone: "+41 79 555 01 20".to_string(),
            contact_email: "info@rentora.ch".to_string(),
            whatsapp_number: "+41 79 555 01 20".to_string(),
            address: "Route de Meyrin 210, 1217 Genève".to_string(),
            opening_hours: "tous les jours de 9h à 19h".to_string(),
            minimum_age: 23,
            minimum_license_years: 3,
            accepted_documents: "une pièce d'identité valable, votre permis de conduire et un justificatif de domicile".to_string(),
            payment_methods: "carte de crédit, TWINT ou virement bancaire (la caution se règle par carte de crédit)".to_string(),
        }
    }
}
