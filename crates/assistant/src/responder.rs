use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use rentora_core::availability::blocked_until;
use rentora_core::domain::reservation::ReservationInterval;
use rentora_core::domain::vehicle::{Transmission, Vehicle};

use crate::knowledge::KnowledgeBase;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub content: String,
}

/// Every branch the assistant can take, in no particular order; the priority
/// lives in `default_rules`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    Thanks,
    Farewell,
    SmallTalk,
    Identity,
    PriceForVehicle,
    RentalIntent,
    Availability,
    VehicleInfo,
    Contact,
    Conditions,
    Location,
    Documents,
    Payment,
    Comparison,
    Fallback,
}

/// What the predicates see: the normalized last user message and the vehicle
/// it refers to (an explicit mention in the text, or failing that the page
/// context the visitor arrived from).
pub struct MessageCues<'a> {
    pub text: &'a str,
    pub vehicle: Option<&'a Vehicle>,
}

type Predicate = fn(&MessageCues<'_>) -> bool;

pub struct IntentRule {
    pub intent: Intent,
    matches: Predicate,
}

/// The priority list. Rules are evaluated top to bottom and the first match
/// wins, so several predicates may cover the same input on purpose — a price
/// question naming a vehicle must land on `PriceForVehicle`, never on the
/// generic price branch or the vehicle-info branch below it. Reordering this
/// list changes observable behavior.
pub fn default_rules() -> Vec<IntentRule> {
    vec![
        IntentRule { intent: Intent::Greeting, matches: is_greeting },
        IntentRule { intent: Intent::Thanks, matches: is_thanks },
        IntentRule { intent: Intent::Farewell, matches: is_farewell },
        IntentRule { intent: Intent::SmallTalk, matches: is_small_talk },
        IntentRule { intent: Intent::Identity, matches: is_identity_question },
        IntentRule { intent: Intent::PriceForVehicle, matches: is_price_for_vehicle },
        IntentRule { intent: Intent::RentalIntent, matches: is_rental_intent },
        IntentRule { intent: Intent::Availability, matches: is_availability_question },
        IntentRule { intent: Intent::VehicleInfo, matches: is_vehicle_info },
        IntentRule { intent: Intent::Contact, matches: is_contact_question },
        IntentRule { intent: Intent::Conditions, matches: is_conditions_question },
        IntentRule { intent: Intent::Location, matches: is_location_question },
        IntentRule { intent: Intent::Documents, matches: is_documents_question },
        IntentRule { intent: Intent::Payment, matches: is_payment_question },
        IntentRule { intent: Intent::Comparison, matches: is_comparison_question },
    ]
}

/// Stateless scripted responder. Each call receives the full message history
/// plus the optional vehicle-page context; only the last user message drives
/// the cascade. Same input, same branch, same text — there is no randomness
/// and no hidden state.
pub struct Responder {
    catalogue: Vec<Vehicle>,
    reservations: Vec<ReservationInterval>,
    knowledge: KnowledgeBase,
    rules: Vec<IntentRule>,
}

impl Responder {
    pub fn new(
        catalogue: Vec<Vehicle>,
        reservations: Vec<ReservationInterval>,
        knowledge: KnowledgeBase,
    ) -> Self {
        Self { catalogue, reservations, knowledge, rules: default_rules() }
    }

    pub fn respond(
        &self,
        history: &[ChatMessage],
        vehicle_context: Option<&Vehicle>,
        today: NaiveDate,
    ) -> AssistantReply {
        let Some(last_user_message) = last_user_message(history) else {
            return AssistantReply { content: self.fallback_text() };
        };

        let normalized = normalize(&last_user_message.content);
        let vehicle = self.mentioned_vehicle(&normalized).or(vehicle_context);
        let cues = MessageCues { text: &normalized, vehicle };

        let intent = self
            .rules
            .iter()
            .find(|rule| (rule.matches)(&cues))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::Fallback);

        AssistantReply { content: self.render(intent, &cues, today) }
    }

    /// The branch a message would take, without rendering. Exposed so the
    /// priority order is testable on its own.
    pub fn classify(&self, message: &str, vehicle_context: Option<&Vehicle>) -> Intent {
        let normalized = normalize(message);
        let vehicle = self.mentioned_vehicle(&normalized).or(vehicle_context);
        let cues = MessageCues { text: &normalized, vehicle };

        self.rules
            .iter()
            .find(|rule| (rule.matches)(&cues))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::Fallback)
    }

    fn mentioned_vehicle(&self, normalized_text: &str) -> Option<&Vehicle> {
        self.catalogue.iter().find(|vehicle| {
            let brand = vehicle.brand.to_lowercase();
            let model = vehicle.model.to_lowercase();
            normalized_text.contains(&vehicle.slug)
                || normalized_text.contains(&brand)
                || normalized_text.contains(&model)
        })
    }

    fn render(&self, intent: Intent, cues: &MessageCues<'_>, today: NaiveDate) -> String {
        let kb = &self.knowledge;
        match intent {
            Intent::Greeting => format!(
                "Bonjour ! Je suis l'assistant {}. Posez-moi vos questions sur nos véhicules, \
                 les prix, les disponibilités ou les conditions de location.",
                kb.site_name
            ),
            Intent::Thanks => "Avec plaisir ! N'hésitez pas si vous avez d'autres questions."
                .to_string(),
            Intent::Farewell => format!(
                "Au revoir et à bientôt chez {} ! Bonne route.",
                kb.site_name
            ),
            Intent::SmallTalk => {
                "Très bien, merci ! Et vous ? Dites-moi comment je peux vous aider pour votre \
                 prochaine location."
                    .to_string()
            }
            Intent::Identity => format!(
                "Je suis l'assistant virtuel de {}. Je réponds aux questions sur le parc, les \
                 prix, les disponibilités et les conditions — pour le reste, notre équipe est \
                 joignable au {}.",
                kb.site_name, kb.contact_phone
            ),
            Intent::PriceForVehicle => self.render_price_deflection(cues.vehicle),
            Intent::RentalIntent => {
                "Pour louer un véhicule : choisissez-le dans la section Véhicules, utilisez \
                 Véhicules → Calculer le prix pour obtenir le détail selon la durée et les \
                 kilomètres, puis envoyez-nous votre demande — nous confirmons la réservation \
                 rapidement."
                    .to_string()
            }
            Intent::Availability => self.render_availability(cues.vehicle, today),
            Intent::VehicleInfo => self.render_vehicle_info(cues.vehicle),
            Intent::Contact => format!(
                "Vous pouvez nous joindre par téléphone au {}, par WhatsApp au {} ou par e-mail \
                 à {}. Nous répondons {}.",
                kb.contact_phone, kb.whatsapp_number, kb.contact_email, kb.opening_hours
            ),
            Intent::Conditions => format!(
                "Conditions de location : avoir au minimum {} ans et {} ans de permis. Une \
                 caution est demandée à la prise du véhicule (montant indiqué sur chaque fiche) \
                 et chaque formule inclut un forfait kilométrique.",
                kb.minimum_age, kb.minimum_license_years
            ),
            Intent::Location => format!(
                "Nous sommes situés {} — ouvert {}. La remise du véhicule se fait sur place ou \
                 en livraison (facturée au kilomètre).",
                kb.address, kb.opening_hours
            ),
            Intent::Documents => format!(
                "Pour louer, il vous faut {}.",
                kb.accepted_documents
            ),
            Intent::Payment => format!(
                "Nous acceptons {}.",
                kb.payment_methods
            ),
            Intent::Comparison => {
                "Chaque véhicule a sa fiche détaillée (puissance, boîte, forfaits kilométriques) \
                 dans la section Véhicules — le plus simple pour comparer est d'ouvrir les deux \
                 fiches côte à côte, puis Véhicules → Calculer le prix pour la durée qui vous \
                 intéresse."
                    .to_string()
            }
            Intent::Fallback => self.fallback_text(),
        }
    }

    /// The assistant never quotes a number itself: the calculator on the
    /// vehicle page is the single source of pricing, and the bot pointing
    /// there instead of computing keeps the two from drifting apart.
    fn render_price_deflection(&self, vehicle: Option<&Vehicle>) -> String {
        match vehicle {
            Some(vehicle) => format!(
                "Pour connaître le prix de la {}, rendez-vous sur sa fiche puis Véhicules → \
                 Calculer le prix : vous y obtiendrez le détail exact selon la durée, les \
                 kilomètres supplémentaires et le transport.",
                vehicle.display_name()
            ),
            None => "Tous nos tarifs se calculent via Véhicules → Calculer le prix, selon la \
                     durée choisie et les kilomètres souhaités."
                .to_string(),
        }
    }

    fn render_availability(&self, vehicle: Option<&Vehicle>, today: NaiveDate) -> String {
        let Some(vehicle) = vehicle else {
            return "Les disponibilités sont indiquées sur la fiche de chaque véhicule, avec son \
                    calendrier de réservation à jour."
                .to_string();
        };

        let mut content = match blocked_until(&self.reservations, &vehicle.slug, today) {
            Some(end_date) => format!(
                "La {} est actuellement réservée jusqu'au {} inclus ; elle redevient disponible \
                 dès le lendemain.",
                vehicle.display_name(),
                end_date.format("%d.%m.%Y")
            ),
            None => format!(
                "Bonne nouvelle : la {} est disponible aujourd'hui.",
                vehicle.display_name()
            ),
        };

        if let Some(calendar_url) = &vehicle.calendar_url {
            content.push_str(&format!(
                " Vous pouvez consulter son calendrier complet ici : {calendar_url}"
            ));
        }

        content
    }

    fn render_vehicle_info(&self, vehicle: Option<&Vehicle>) -> String {
        match vehicle {
            Some(vehicle) => format!(
                "La {} ({}) développe {} ch, boîte {}, catégorie {}. Elle est basée à {} et la \
                 caution est de {} CHF. Tous les détails et photos sont sur sa fiche.",
                vehicle.display_name(),
                vehicle.year,
                vehicle.power_hp,
                transmission_label_fr(vehicle.transmission),
                vehicle.category,
                vehicle.location,
                vehicle.deposit_chf
            ),
            None => {
                let names = self
                    .catalogue
                    .iter()
                    .map(Vehicle::display_name)
                    .collect::<Vec<_>>()
                    .join(", ");
                if names.is_empty() {
                    "Notre parc est présenté dans la section Véhicules.".to_string()
                } else {
                    format!(
                        "Notre parc actuel : {names}. Chaque fiche détaille puissance, boîte et \
                         forfaits kilométriques."
                    )
                }
            }
        }
    }

    fn fallback_text(&self) -> String {
        "Je n'ai pas bien compris votre demande. Voici les sections du site qui peuvent vous \
         aider : Véhicules, Calculer le prix, Disponibilités, Conditions de location, Contact."
            .to_string()
    }
}

fn last_user_message(history: &[ChatMessage]) -> Option<&ChatMessage> {
    history.iter().rev().find(|message| message.role == ChatRole::User)
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn transmission_label_fr(transmission: Transmission) -> &'static str {
    match transmission {
        Transmission::Manual => "manuelle",
        Transmission::Automatic => "automatique",
    }
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

/// Whole-word match for keywords that are substrings of too many French
/// words ("age" in "garage", "vs" in who knows what).
fn has_word(text: &str, word: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric()).any(|token| token == word)
}

fn is_greeting(cues: &MessageCues<'_>) -> bool {
    contains_any(cues.text, &["bonjour", "bonsoir", "salut", "coucou", "hello"])
}

fn is_thanks(cues: &MessageCues<'_>) -> bool {
    contains_any(cues.text, &["merci", "thanks"])
}

fn is_farewell(cues: &MessageCues<'_>) -> bool {
    contains_any(cues.text, &["au revoir", "à bientôt", "a bientot", "bonne journée", "bye"])
}

fn is_small_talk(cues: &MessageCues<'_>) -> bool {
    contains_any(cues.text, &["ça va", "ca va", "comment vas", "comment allez", "tu vas bien"])
}

fn is_identity_question(cues: &MessageCues<'_>) -> bool {
    contains_any(
        cues.text,
        &["qui es-tu", "qui es tu", "qui êtes-vous", "qui etes-vous", "tu es qui", "un robot"],
    ) || has_word(cues.text, "bot")
        || has_word(cues.text, "ia")
}

fn mentions_price(text: &str) -> bool {
    contains_any(text, &["prix", "tarif", "combien", "coût", "cout"]) || has_word(text, "chf")
}

fn is_price_for_vehicle(cues: &MessageCues<'_>) -> bool {
    mentions_price(cues.text) && cues.vehicle.is_some()
}

fn is_rental_intent(cues: &MessageCues<'_>) -> bool {
    contains_any(cues.text, &["louer", "location", "réserver", "reserver", "réservation", "reservation"])
        || mentions_price(cues.text)
}

fn is_availability_question(cues: &MessageCues<'_>) -> bool {
    contains_any(cues.text, &["disponib", "dispo", "libre", "calendrier", "occupé", "occupe"])
}

fn is_vehicle_info(cues: &MessageCues<'_>) -> bool {
    cues.vehicle.is_some()
        || contains_any(
            cues.text,
            &["véhicule", "vehicule", "voiture", "modèle", "modele", "puissance", "parc", "flotte"],
        )
}

fn is_contact_question(cues: &MessageCues<'_>) -> bool {
    contains_any(
        cues.text,
        &["contact", "téléphone", "telephone", "whatsapp", "e-mail", "email", "joindre", "appeler", "numéro", "numero"],
    )
}

fn is_conditions_question(cues: &MessageCues<'_>) -> bool {
    contains_any(cues.text, &["condition", "âge", "permis", "caution", "assurance", "éligib", "eligib"])
        || has_word(cues.text, "age")
}

fn is_location_question(cues: &MessageCues<'_>) -> bool {
    contains_any(
        cues.text,
        &["adresse", "où êtes", "ou etes", "où se trouve", "ou se trouve", "localis", "situé", "situe", "horaire"],
    )
}

fn is_documents_question(cues: &MessageCues<'_>) -> bool {
    contains_any(cues.text, &["document", "papier", "pièce", "piece", "justificatif"])
}

fn is_payment_question(cues: &MessageCues<'_>) -> bool {
    contains_any(
        cues.text,
        &["paiement", "payer", "carte", "twint", "espèces", "especes", "cash", "virement"],
    )
}

fn is_comparison_question(cues: &MessageCues<'_>) -> bool {
    contains_any(cues.text, &["différence", "difference", "compar", "versus", "mieux", "plutôt", "plutot"])
        || has_word(cues.text, "vs")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use rentora_core::domain::reservation::ReservationInterval;
    use rentora_core::domain::vehicle::{
        slugify, DurationTier, TierPricing, Transmission, Vehicle,
    };

    use crate::knowledge::KnowledgeBase;

    use super::{ChatMessage, ChatRole, Intent, Responder};

    fn vehicle(brand: &str, model: &str, price_24h: i64) -> Vehicle {
        let mut pricing = BTreeMap::new();
        pricing.insert(
            DurationTier::TwentyFourHours,
            TierPricing { price_chf: price_24h, included_km: 200 },
        );

        Vehicle {
            slug: slugify(brand, model),
            brand: brand.to_string(),
            model: model.to_string(),
            year: 2019,
            power_hp: 570,
            transmission: Transmission::Automatic,
            category: "Supercar".to_string(),
            pricing,
            extra_km_rate: Some(Decimal::from(5)),
            deposit_chf: 8000,
            location: "Genève".to_string(),
            media: Vec::new(),
            calendar_url: None,
        }
    }

    fn responder_with(reservations: Vec<ReservationInterval>) -> Responder {
        Responder::new(
            vec![vehicle("McLaren", "570S", 890), vehicle("Audi", "R8 V8", 470)],
            reservations,
            KnowledgeBase::default(),
        )
    }

    fn user(content: &str) -> ChatMessage {
        ChatMessage { role: ChatRole::User, content: content.to_string() }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 11).expect("valid date")
    }

    #[test]
    fn mclaren_price_question_deflects_to_the_calculator() {
        let responder = responder_with(Vec::new());
        let reply =
            responder.respond(&[user("Quel est le prix de la McLaren ?")], None, today());

        assert!(reply.content.contains("Véhicules → Calculer le prix"));
        assert!(!reply.content.contains("CHF"), "the bot never quotes an amount: {}", reply.content);
        assert!(reply.content.contains("McLaren 570S"));
    }

    #[test]
    fn price_with_named_vehicle_outranks_generic_price_and_vehicle_info() {
        let responder = responder_with(Vec::new());

        assert_eq!(
            responder.classify("combien coûte la mclaren ?", None),
            Intent::PriceForVehicle
        );
        assert_eq!(responder.classify("quels sont vos tarifs ?", None), Intent::RentalIntent);
        assert_eq!(responder.classify("parlez-moi de la mclaren", None), Intent::VehicleInfo);
    }

    #[test]
    fn page_context_counts_as_the_named_vehicle() {
        let responder = responder_with(Vec::new());
        let audi = vehicle("Audi", "R8 V8", 470);

        assert_eq!(
            responder.classify("combien ça coûte pour 24h ?", Some(&audi)),
            Intent::PriceForVehicle
        );

        let reply =
            responder.respond(&[user("combien ça coûte pour 24h ?")], Some(&audi), today());
        assert!(reply.content.contains("Audi R8 V8"));
        assert!(reply.content.contains("Calculer le prix"));
    }

    #[test]
    fn availability_consults_the_ledger_and_reports_the_latest_end() {
        let start = NaiveDate::from_ymd_opt(2026, 4, 10).expect("date");
        let short_end = NaiveDate::from_ymd_opt(2026, 4, 12).expect("date");
        let long_end = NaiveDate::from_ymd_opt(2026, 4, 18).expect("date");
        let reservations = vec![
            ReservationInterval::new("mclaren-570s", start, short_end),
            ReservationInterval::new("mclaren-570s", start, long_end),
        ];

        let responder = responder_with(reservations);
        let reply =
            responder.respond(&[user("La McLaren est-elle disponible ?")], None, today());

        assert!(reply.content.contains("18.04.2026"), "max end date wins: {}", reply.content);
    }

    #[test]
    fn free_vehicle_reports_available_today() {
        let responder = responder_with(Vec::new());
        let reply = responder.respond(&[user("la mclaren est dispo ?")], None, today());
        assert!(reply.content.contains("disponible aujourd'hui"));
    }

    #[test]
    fn unmatched_message_gets_the_sections_fallback_never_an_error() {
        let responder = responder_with(Vec::new());
        let reply = responder.respond(&[user("xyzzy 42 plugh")], None, today());

        assert!(!reply.content.is_empty());
        assert!(reply.content.contains("Véhicules"));
        assert!(reply.content.contains("Contact"));

        // No user message at all degrades to the same fallback, not an error.
        let empty_history = responder.respond(&[], None, today());
        assert_eq!(empty_history.content, reply.content);
    }

    #[test]
    fn same_input_always_takes_the_same_branch() {
        let responder = responder_with(Vec::new());
        let history = vec![
            user("bonjour"),
            ChatMessage { role: ChatRole::Assistant, content: "Bonjour !".to_string() },
            user("Quel est le prix de la McLaren ?"),
        ];

        let first = responder.respond(&history, None, today());
        let second = responder.respond(&history, None, today());
        assert_eq!(first, second);
    }

    #[test]
    fn only_the_last_user_message_drives_the_branch() {
        let responder = responder_with(Vec::new());
        let history = vec![
            user("Quel est le prix de la McLaren ?"),
            ChatMessage { role: ChatRole::Assistant, content: "…".to_string() },
            user("merci beaucoup !"),
        ];

        let reply = responder.respond(&history, None, today());
        assert!(reply.content.contains("plaisir"));
    }

    #[test]
    fn common_phrases_route_to_their_intents() {
        struct Case {
            text: &'static str,
            expected: Intent,
        }

        let cases = vec![
            Case { text: "Bonjour !", expected: Intent::Greeting },
            Case { text: "salut, ça roule ?", expected: Intent::Greeting },
            Case { text: "merci pour tout", expected: Intent::Thanks },
            Case { text: "au revoir", expected: Intent::Farewell },
            Case { text: "ça va ?", expected: Intent::SmallTalk },
            Case { text: "tu es un robot ?", expected: Intent::Identity },
            Case { text: "prix de la audi ?", expected: Intent::PriceForVehicle },
            Case { text: "je veux louer une voiture ce week-end", expected: Intent::RentalIntent },
            Case { text: "comment réserver ?", expected: Intent::RentalIntent },
            Case { text: "c'est combien ?", expected: Intent::RentalIntent },
            Case { text: "quelles sont les disponibilités ?", expected: Intent::Availability },
            Case { text: "la r8 v8 est libre demain ?", expected: Intent::Availability },
            Case { text: "quels véhicules avez-vous ?", expected: Intent::VehicleInfo },
            Case { text: "votre numéro de téléphone ?", expected: Intent::Contact },
            Case { text: "vous avez whatsapp ?", expected: Intent::Contact },
            Case { text: "quel âge faut-il ?", expected: Intent::Conditions },
            Case { text: "il faut le permis depuis quand ?", expected: Intent::Conditions },
            Case { text: "quelle est votre adresse ?", expected: Intent::Location },
            Case { text: "quels documents dois-je fournir ?", expected: Intent::Documents },
            Case { text: "on peut payer par twint ?", expected: Intent::Payment },
            Case { text: "quelle est la différence entre les deux ?", expected: Intent::Comparison },
            Case { text: "blablabla", expected: Intent::Fallback },
        ];

        let responder = responder_with(Vec::new());
        for (index, case) in cases.iter().enumerate() {
            assert_eq!(
                responder.classify(case.text, None),
                case.expected,
                "case {index}: {}",
                case.text
            );
        }
    }
}
