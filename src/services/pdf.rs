// Pet passport PDF export
// Single A4 page, fixed text coordinates; empty fields render as empty lines

use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::{models::profile::PetProfile, utils::service_error::ServiceError};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const LEFT_MARGIN_MM: f32 = 20.0;

const TITLE_SIZE: f32 = 22.0;
const HEADING_SIZE: f32 = 16.0;
const FIELD_SIZE: f32 = 14.0;

/// The layout is specified from the top edge; printpdf measures from the bottom
fn from_top(mm: f32) -> Mm {
    Mm(PAGE_HEIGHT_MM - mm)
}

/// Render the passport document for one profile. Layout is static: the
/// same field positions regardless of content, no pagination.
pub fn passport_pdf(profile: &PetProfile) -> Result<Vec<u8>, ServiceError> {
    let (doc, page, layer) = PdfDocument::new(
        "Pet Passport",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| pdf_error(&e))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| pdf_error(&e))?;

    let layer = doc.get_page(page).get_layer(layer);
    let x = Mm(LEFT_MARGIN_MM);

    layer.use_text("Pet Passport", TITLE_SIZE, x, from_top(20.0), &bold);

    layer.use_text(format!("Name: {}", profile.name), FIELD_SIZE, x, from_top(40.0), &font);
    layer.use_text(format!("Breed: {}", profile.breed), FIELD_SIZE, x, from_top(50.0), &font);
    layer.use_text(format!("Age: {} years", profile.age), FIELD_SIZE, x, from_top(60.0), &font);
    layer.use_text(
        format!("Description: {}", profile.description),
        FIELD_SIZE,
        x,
        from_top(70.0),
        &font,
    );

    // The address line is the one conditional piece of the layout
    if !profile.address.is_empty() {
        layer.use_text(
            format!("Address: {}", profile.address),
            FIELD_SIZE,
            x,
            from_top(80.0),
            &font,
        );
    }

    layer.use_text("Owner Information", HEADING_SIZE, x, from_top(95.0), &bold);
    layer.use_text(
        format!("Name: {}", profile.owner_name),
        FIELD_SIZE,
        x,
        from_top(105.0),
        &font,
    );
    layer.use_text(
        format!("Phone: {}", profile.owner_phone),
        FIELD_SIZE,
        x,
        from_top(115.0),
        &font,
    );
    layer.use_text(
        format!("Email: {}", profile.owner_email),
        FIELD_SIZE,
        x,
        from_top(125.0),
        &font,
    );

    doc.save_to_bytes().map_err(|e| pdf_error(&e))
}

fn pdf_error(err: &dyn std::fmt::Display) -> ServiceError {
    tracing::error!("PDF generation failed: {}", err);
    ServiceError::InternalError
}

/// Download filename derived from the pet's name
pub fn passport_filename(profile: &PetProfile) -> String {
    let slug: String = profile
        .name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        "pet-passport.pdf".to_string()
    } else {
        format!("{}-passport.pdf", slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{DEFAULT_COVER_IMAGE_URL, DEFAULT_IMAGE_URL};
    use chrono::Utc;

    fn sample(name: &str, address: &str) -> PetProfile {
        let now = Utc::now();
        PetProfile {
            id: "042".to_string(),
            name: name.to_string(),
            breed: "Beagle".to_string(),
            age: 2,
            gender: "female".to_string(),
            address: address.to_string(),
            description: "Curious and playful".to_string(),
            image_url: DEFAULT_IMAGE_URL.to_string(),
            cover_image_url: DEFAULT_COVER_IMAGE_URL.to_string(),
            owner_name: "Kasia".to_string(),
            owner_phone: "+48 777 888 999".to_string(),
            owner_email: "kasia@example.com".to_string(),
            pin: None,
            is_complete: true,
            created_at: now,
            last_updated: now,
        }
    }

    #[test]
    fn produces_pdf_bytes() {
        let bytes = passport_pdf(&sample("Daisy", "ul. Kwiatowa 9")).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn empty_fields_still_render() {
        let bytes = passport_pdf(&sample("", "")).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn filename_from_pet_name() {
        assert_eq!(passport_filename(&sample("Daisy", "")), "Daisy-passport.pdf");
        assert_eq!(
            passport_filename(&sample("Mr. Waffles", "")),
            "Mr-Waffles-passport.pdf"
        );
        assert_eq!(passport_filename(&sample("", "")), "pet-passport.pdf");
    }
}
