//! API models for the public page.

use serde::{Deserialize, Serialize};

use super::photos::PhotoView;
use crate::config::EventConfig;

/// Outcome of the last form post, carried through the redirect back to `/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsaStatus {
    Tack,
    Fel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotosStatus {
    Klart,
    Fel,
}

/// Query string of `GET /`. Unknown values are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HomeQuery {
    #[serde(default, deserialize_with = "lenient")]
    pub osa: Option<OsaStatus>,
    #[serde(default, deserialize_with = "lenient")]
    pub bilder: Option<PhotosStatus>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(serde_json::Value::String(value)).ok()))
}

#[derive(Debug, Clone, Serialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

impl Faq {
    fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Frequently asked questions, with names and dates taken from the event configuration
pub fn faqs(event: &EventConfig) -> Vec<Faq> {
    let couple = event.couple.replace(" & ", " och ");
    let contact = &event.contact_pair;

    vec![
        Faq::new(
            "Vad är klädkoden?",
            "Kavaj. Tänk \"uppklätt men inte så uppklätt att du börjar tala med kunglig dialekt\".\n\n\
             För herrar betyder det kostym (ja, hela kostymen – inte bara kavajen som namnet luras med), \
             skjorta och gärna något runt halsen som antyder att du försökt: slips, fluga eller ett riktigt \
             självsäkert leende.\n\n\
             För damer är det fritt fram med klänning, kjol eller byxdress som känns festlig men inte kräver \
             att någon rullar ut en röd matta. Snyggt, stiligt och redo för att dansa utan att behöva oroa sig \
             för att trampa på en golvlång klänning.\n\n\
             Kort sagt: kom som den bästa versionen av dig själv – den som både kan skåla elegant och dansa \
             obekymrat.",
        ),
        Faq::new(
            "Är barn välkomna?",
            "Barn är varmt välkomna på vigseln, men därefter önskar vi fira dagen utan de små. \
             Spädbarn är självklart välkomna.",
        ),
        Faq::new(
            "Får vi fota under dagen?",
            "Ja! Fota gärna och dela med er via bilduppladdningen på denna sida.",
        ),
        Faq::new(
            "Kommer vi att vara inom- eller utomhus?",
            "Vi kommer, om vädret tillåter, att fira delar av dagen utomhus, men både vigseln och middagen \
             är sittandes inomhus.",
        ),
        Faq::new(
            "Behöver jag ta mig mellan vigseln och middagen?",
            "Nej, vigseln och festlokalen ligger precis bredvid varandra.",
        ),
        Faq::new(
            "Var finns parkering?",
            "Dalarö kyrka har egna parkeringsplatser. Det finns även flera andra parkeringsområden i \
             närheten av kyrkan:\n\n\
             • Dalarö torg – centralt och nära kyrkan\n\
             • Askfatshamnen – större parkering nära vattnet\n\
             • Dalarö begravningsplats – avgiftsfri parkering i 6 timmar\n\
             • Vadviken – här finns även en avgiftsfri parkering mittemot Vadviken (max 12 timmar)",
        ),
        Faq::new(
            "När och var ska jag O.S.A?",
            format!(
                "Vi tackar för svar på inbjudan senast {}. O.S.A via hemsidan.",
                event.rsvp_deadline
            ),
        ),
        Faq::new(
            "Vem kontaktar jag vid frågor?",
            format!("Hör av er till oss, {couple}, eller vårt toastpar {contact}."),
        ),
        Faq::new(
            "Jag vill anmäla tal eller annat inslag under kvällen. Hur går jag tillväga?",
            format!("Kontakta vårt toastpar {contact}."),
        ),
        Faq::new(
            "Jag kan tyvärr inte komma, men vill bidra till dagen på annat sätt. Hur gör jag?",
            format!("Kontakta vårt toastpar {contact}."),
        ),
    ]
}

/// Context of the public page
#[derive(Debug, Clone, Serialize)]
pub struct HomePage<'a> {
    pub event: &'a EventConfig,
    pub map_url: String,
    pub faqs: Vec<Faq>,
    pub osa_status: Option<OsaStatus>,
    pub photos_status: Option<PhotosStatus>,
    /// Photos selected for the homepage, newest first
    pub photos: Vec<PhotoView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faqs_use_event_details() {
        let event = EventConfig {
            couple: "Anna & Bo".to_string(),
            rsvp_deadline: "1 maj".to_string(),
            contact_pair: "Cia och Dan".to_string(),
            ..Default::default()
        };
        let faqs = faqs(&event);

        assert_eq!(faqs.len(), 10);
        assert!(faqs.iter().any(|f| f.answer.contains("senast 1 maj")));
        assert!(faqs.iter().any(|f| f.answer == "Hör av er till oss, Anna och Bo, eller vårt toastpar Cia och Dan."));
        assert!(faqs[0].answer.starts_with("Kavaj."));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&OsaStatus::Tack).unwrap(), "\"tack\"");
        assert_eq!(serde_json::to_string(&PhotosStatus::Klart).unwrap(), "\"klart\"");
    }

    #[test]
    fn test_unknown_query_values_are_ignored() {
        let parse = |uri: &str| {
            let uri: axum::http::Uri = uri.parse().unwrap();
            axum::extract::Query::<HomeQuery>::try_from_uri(&uri).unwrap().0
        };

        let query = parse("/?osa=tack&bilder=fel");
        assert_eq!(query.osa, Some(OsaStatus::Tack));
        assert_eq!(query.bilder, Some(PhotosStatus::Fel));

        let query = parse("/?osa=%3Cscript%3E");
        assert_eq!(query.osa, None);
        assert_eq!(query.bilder, None);
    }
}
