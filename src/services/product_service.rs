use crate::models::pricing::RateRange;
use crate::models::product::{ProductContent, ProductDetails, ProductNote, ProductRate};
use crate::services::pricing_service::PricingService;
use crate::services::product_classifier;
use crate::services::rate_normalizer::{self, DEFAULT_CURRENCY};
use crate::services::tourplan::xml_builder::INFO_DETAILS;
use crate::services::tourplan::xml_parser::extract_reply;
use crate::services::tourplan::{HostConnect, OptionInfoRequest, TourPlanError, XmlNode};

pub const PRICE_ON_APPLICATION_RATE: &str = "Price on Application";

pub struct ProductService;

impl ProductService {
    /// Product page data for one product code.
    pub async fn get_product_details<C: HostConnect>(
        client: &C,
        product_code: &str,
    ) -> Result<ProductDetails, TourPlanError> {
        let (agent_id, password) = client.credentials();
        let xml = OptionInfoRequest::for_product(product_code)
            .info(INFO_DETAILS)
            .build(agent_id, password);

        log::info!("Getting product details for {}", product_code);
        let root = client.send(xml).await?;
        let reply = extract_reply(&root, "OptionInfoReply")?;
        let option = reply
            .children("Option")
            .next()
            .ok_or_else(|| TourPlanError::NotFound(product_code.to_string()))?;

        Ok(details_from_option(product_code, option))
    }
}

fn details_from_option(product_code: &str, option: &XmlNode) -> ProductDetails {
    let general = option.child("OptGeneral");
    let general_text = |name: &str| general.and_then(|g| g.child_text(name)).map(str::to_string);

    let periods = general_text("Periods")
        .and_then(|p| p.parse::<u32>().ok())
        .unwrap_or(0);
    let (notes, content) = notes_from_option(option);

    ProductDetails {
        code: option.child_text("Opt").unwrap_or(product_code).to_string(),
        name: general_text("Description").unwrap_or_else(|| "Unnamed Product".to_string()),
        description: general_text("Comment").unwrap_or_default(),
        supplier_name: general_text("SupplierName").unwrap_or_default(),
        location: general_text("LocalityDescription").unwrap_or_default(),
        periods,
        duration: if periods > 0 {
            format!("{} days", periods)
        } else {
            String::new()
        },
        class: general_text("ClassDescription"),
        product_type: product_classifier::classify_code(product_code),
        rates: rates_from_option(product_code, option),
        notes,
        content,
    }
}

fn product_rate(product_code: &str, range: &RateRange) -> ProductRate {
    ProductRate {
        date_from: Some(range.date_from),
        date_to: Some(range.date_to),
        currency: range.currency.clone(),
        single_rate: range.single_rate,
        double_rate: range.double_rate,
        twin_rate: range.twin_rate,
        rate_name: range.rate_name.clone(),
        display_price: PricingService::display_price(
            product_code,
            &range.currency,
            range.single_rate,
            range.twin_rate,
        ),
    }
}

/// Dated rates, then the stay total. Never empty: a product with no rates
/// gets a zero "Price on Application" entry for the product page.
fn rates_from_option(product_code: &str, option: &XmlNode) -> Vec<ProductRate> {
    let mut rates: Vec<ProductRate> = rate_normalizer::date_range_rates(option)
        .iter()
        .map(|range| product_rate(product_code, range))
        .collect();

    if let Some(flat) = rate_normalizer::stay_result_rate(option) {
        rates.push(ProductRate {
            date_from: None,
            date_to: None,
            display_price: PricingService::display_price(
                product_code,
                &flat.currency,
                flat.single_rate,
                flat.twin_rate,
            ),
            currency: flat.currency,
            single_rate: flat.single_rate,
            double_rate: flat.double_rate,
            twin_rate: flat.twin_rate,
            rate_name: flat.rate_name,
        });
    }

    if rates.is_empty() {
        rates.push(ProductRate {
            date_from: None,
            date_to: None,
            currency: DEFAULT_CURRENCY.to_string(),
            single_rate: 0,
            double_rate: 0,
            twin_rate: 0,
            rate_name: PRICE_ON_APPLICATION_RATE.to_string(),
            display_price: PricingService::display_price(product_code, DEFAULT_CURRENCY, 0, 0),
        });
    }
    rates
}

fn notes_from_option(option: &XmlNode) -> (Vec<ProductNote>, ProductContent) {
    let mut notes = Vec::new();
    let mut content = ProductContent::default();

    let Some(container) = option.child("OptionNotes") else {
        return (notes, content);
    };

    for note in container.children("OptionNote") {
        let category = note.child_text("NoteCategory").unwrap_or_default().to_string();
        let text = note.child_text("NoteText").unwrap_or_default().to_string();

        let section = match category.as_str() {
            "PII" => Some(&mut content.introduction),
            "PDW" | "DTL" => Some(&mut content.details),
            "INC" | "INE" => Some(&mut content.inclusions),
            "EXC" => Some(&mut content.exclusions),
            "PHL" | "HLT" | "SHL" => Some(&mut content.highlights),
            "TRM" | "TCO" => Some(&mut content.terms),
            "MPI" => Some(&mut content.map_image),
            _ => None,
        };
        if let Some(section) = section {
            *section = Some(text.clone());
        }

        notes.push(ProductNote { category, text });
    }

    (notes, content)
}
