use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::TourPlanError;

/// Generic element tree for HostConnect replies.
///
/// HostConnect repeats an element when there are several values and emits
/// it once otherwise, so lookups go through `children(name)` which covers
/// both shapes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follows a chain of first-match child names.
    pub fn path(&self, path: &[&str]) -> Option<&XmlNode> {
        path.iter().try_fold(self, |node, name| node.child(name))
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Trimmed text of a direct child, `None` when missing or blank.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name)
            .map(|c| c.text())
            .filter(|text| !text.is_empty())
    }
}

fn parse_error(err: impl std::fmt::Display) -> TourPlanError {
    TourPlanError::Parse(err.to_string())
}

fn open_node(start: &BytesStart) -> Result<XmlNode, TourPlanError> {
    let mut node = XmlNode {
        name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
        ..Default::default()
    };
    for attr in start.attributes() {
        let attr = attr.map_err(parse_error)?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value().map_err(parse_error)?.into_owned();
        node.attributes.push((key, value));
    }
    Ok(node)
}

fn attach(
    stack: &mut Vec<XmlNode>,
    root: &mut Option<XmlNode>,
    node: XmlNode,
) -> Result<(), TourPlanError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        Ok(())
    } else if root.is_none() {
        *root = Some(node);
        Ok(())
    } else {
        Err(TourPlanError::Parse(format!(
            "unexpected second root element <{}>",
            node.name
        )))
    }
}

/// Parses a HostConnect response document into its root element.
pub fn parse_response(xml: &str) -> Result<XmlNode, TourPlanError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => stack.push(open_node(&start)?),
            Ok(Event::Empty(start)) => {
                let node = open_node(&start)?;
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::End(_)) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| TourPlanError::Parse("unbalanced closing tag".to_string()))?;
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::Text(text)) => {
                let text = text.unescape().map_err(parse_error)?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(TourPlanError::Parse(format!(
                    "error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(TourPlanError::Parse(format!(
            "document ended inside <{}>",
            open.name
        )));
    }

    root.ok_or_else(|| TourPlanError::Parse("document has no root element".to_string()))
}

/// Unwraps `<Reply><{reply_type}>`, turning an `ErrorReply` into an error.
pub fn extract_reply<'a>(root: &'a XmlNode, reply_type: &str) -> Result<&'a XmlNode, TourPlanError> {
    let container = if root.name == "Reply" {
        root
    } else if root.name == reply_type {
        return Ok(root);
    } else {
        return Err(upstream_or_missing(root, reply_type));
    };

    if let Some(reply) = container.child(reply_type) {
        return Ok(reply);
    }
    match container.child("ErrorReply") {
        Some(error) => Err(upstream_or_missing(error, reply_type)),
        None => Err(TourPlanError::Parse(format!("reply has no <{}>", reply_type))),
    }
}

fn upstream_or_missing(node: &XmlNode, reply_type: &str) -> TourPlanError {
    if node.name == "ErrorReply" {
        let message = node
            .child_text("Error")
            .or_else(|| Some(node.text()).filter(|t| !t.is_empty()))
            .unwrap_or("TourPlan API Error");
        TourPlanError::Upstream(message.to_string())
    } else {
        TourPlanError::Parse(format!(
            "expected <Reply> or <{}>, found <{}>",
            reply_type, node.name
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"<?xml version="1.0"?>
<!DOCTYPE Reply SYSTEM "hostConnect_5_05_000.dtd">
<Reply>
  <OptionInfoReply>
    <Option>
      <Opt>BBKCRCHO018TIACP2</Opt>
      <OptGeneral><Description>Chobe Princess &amp; Friends</Description></OptGeneral>
      <OptDateRanges>
        <OptDateRange>
          <DateFrom>2025-09-28</DateFrom>
          <RateSets>
            <RateSet><AppliesDaysOfWeek Mon="Y" Tues="N"/></RateSet>
          </RateSets>
        </OptDateRange>
        <OptDateRange><DateFrom>2026-01-01</DateFrom></OptDateRange>
      </OptDateRanges>
      <OptAvail>-1 -2 -3 4</OptAvail>
    </Option>
  </OptionInfoReply>
</Reply>"#;

    #[test]
    fn test_parses_nested_reply() {
        let root = parse_response(REPLY).unwrap();
        let reply = extract_reply(&root, "OptionInfoReply").unwrap();
        let option = reply.child("Option").unwrap();

        assert_eq!(option.child_text("Opt"), Some("BBKCRCHO018TIACP2"));
        assert_eq!(
            option.path(&["OptGeneral", "Description"]).unwrap().text(),
            "Chobe Princess & Friends"
        );
        assert_eq!(option.path(&["OptDateRanges"]).unwrap().children("OptDateRange").count(), 2);

        let days = option
            .path(&["OptDateRanges", "OptDateRange", "RateSets", "RateSet", "AppliesDaysOfWeek"])
            .unwrap();
        assert_eq!(days.attr("Mon"), Some("Y"));
        assert_eq!(days.attr("Tues"), Some("N"));
        assert_eq!(days.attr("Sun"), None);
        assert_eq!(option.child_text("OptAvail"), Some("-1 -2 -3 4"));
    }

    #[test]
    fn test_error_reply_is_upstream_error() {
        let root = parse_response("<Reply><ErrorReply><Error>1051 SCN Authentication failed</Error></ErrorReply></Reply>").unwrap();
        match extract_reply(&root, "OptionInfoReply") {
            Err(TourPlanError::Upstream(message)) => assert!(message.contains("1051")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_documents_are_parse_errors() {
        assert!(matches!(
            parse_response("<Reply><OptionInfoReply></Reply>"),
            Err(TourPlanError::Parse(_))
        ));
        assert!(matches!(
            parse_response("<Reply><OptionInfoReply>"),
            Err(TourPlanError::Parse(_))
        ));
        assert!(matches!(parse_response("Service Unavailable"), Err(TourPlanError::Parse(_))));
    }

    #[test]
    fn test_missing_reply_type_is_parse_error() {
        let root = parse_response("<Reply><GetBookingReply/></Reply>").unwrap();
        assert!(matches!(
            extract_reply(&root, "OptionInfoReply"),
            Err(TourPlanError::Parse(_))
        ));
    }
}
