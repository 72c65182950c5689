use chrono::NaiveDate;
use quick_xml::escape::escape;

const DOCTYPE: &str = r#"<!DOCTYPE Request SYSTEM "hostConnect_5_05_000.dtd">"#;

/// Info letters for a pricing calendar: general, date ranges, rates and
/// the per-day `OptAvail` string.
pub const INFO_PRICING: &str = "GDMA";
/// Info letters for the product details page: general, notes, rates.
pub const INFO_DETAILS: &str = "GMFTD";

#[derive(Debug, Clone, PartialEq)]
pub struct RoomConfig {
    pub adults: u32,
    pub children: u32,
    pub room_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonDestination {
    pub button_name: Option<String>,
    pub destination_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum Target {
    Opt(String),
    ButtonDestinations(Vec<ButtonDestination>),
}

/// Builder for `OptionInfoRequest` bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionInfoRequest {
    target: Target,
    info: Option<String>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    room_configs: Vec<RoomConfig>,
}

fn element(name: &str, value: &str) -> String {
    format!("<{name}>{}</{name}>", escape(value))
}

impl OptionInfoRequest {
    pub fn for_product(product_code: &str) -> Self {
        Self::with_target(Target::Opt(product_code.to_string()))
    }

    pub fn for_destinations(destinations: Vec<ButtonDestination>) -> Self {
        Self::with_target(Target::ButtonDestinations(destinations))
    }

    fn with_target(target: Target) -> Self {
        Self {
            target,
            info: None,
            date_from: None,
            date_to: None,
            room_configs: Vec::new(),
        }
    }

    pub fn info(mut self, info: &str) -> Self {
        self.info = Some(info.to_string());
        self
    }

    pub fn date_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.date_from = Some(from);
        self.date_to = Some(to);
        self
    }

    pub fn room_configs(mut self, configs: Vec<RoomConfig>) -> Self {
        self.room_configs = configs;
        self
    }

    /// Renders the request document. Element order follows the HostConnect DTD.
    pub fn build(&self, agent_id: &str, password: &str) -> String {
        let mut body = vec![element("AgentID", agent_id), element("Password", password)];

        match &self.target {
            Target::Opt(code) => body.push(element("Opt", code)),
            Target::ButtonDestinations(destinations) if !destinations.is_empty() => {
                let inner: String = destinations
                    .iter()
                    .map(|dest| {
                        let mut xml = String::from("<ButtonDestination>");
                        if let Some(button) = &dest.button_name {
                            xml.push_str(&element("ButtonName", button));
                        }
                        if let Some(destination) = &dest.destination_name {
                            xml.push_str(&element("DestinationName", destination));
                        }
                        xml.push_str("</ButtonDestination>");
                        xml
                    })
                    .collect();
                body.push(format!("<ButtonDestinations>{}</ButtonDestinations>", inner));
            }
            Target::ButtonDestinations(_) => {}
        }

        if let Some(info) = &self.info {
            body.push(element("Info", info));
        }
        if let Some(from) = self.date_from {
            body.push(element("DateFrom", &from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.date_to {
            body.push(element("DateTo", &to.format("%Y-%m-%d").to_string()));
        }

        if !self.room_configs.is_empty() {
            let inner: String = self
                .room_configs
                .iter()
                .map(|config| {
                    let children = if config.children > 0 {
                        element("Children", &config.children.to_string())
                    } else {
                        String::new()
                    };
                    format!(
                        "<RoomConfig>{}{}{}</RoomConfig>",
                        element("Adults", &config.adults.to_string()),
                        children,
                        element("RoomType", &config.room_type)
                    )
                })
                .collect();
            body.push(format!("<RoomConfigs>{}</RoomConfigs>", inner));
        }

        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}\n<Request>\n  <OptionInfoRequest>\n    {}\n  </OptionInfoRequest>\n</Request>",
            DOCTYPE,
            body.join("\n    ")
        )
    }
}
