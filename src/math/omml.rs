//! MathML to OMML conversion.
//!
//! The native tier of the transcoding pipeline produces presentation MathML
//! first; this module maps it onto Office Math markup (OMML), the editable
//! math format of the destination document model. The mapping covers the
//! presentation elements the LaTeX front end actually emits; anything
//! outside that vocabulary is an error, which the pipeline absorbs into the
//! rasterization or literal-text fallback.

use crate::error::{Error, Result};
use xml::reader::{EventReader, XmlEvent};

/// OMML namespace declared on every emitted fragment.
pub const OMML_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/math";

/// A parsed MathML element.
struct MathNode {
    name: String,
    attrs: Vec<(String, String)>,
    text: String,
    children: Vec<MathNode>,
}

impl MathNode {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Convert a presentation MathML document into an OMML fragment.
///
/// Returns a self-contained `m:oMath` fragment (wrapped in `m:oMathPara`
/// when `display_block` is set) with the `m:` namespace declared on the
/// outermost element.
pub fn mathml_to_omml(mathml: &str, display_block: bool) -> Result<String> {
    let root = parse_mathml(mathml)?;

    let mut body = String::new();
    emit_children(&root, &mut body)?;

    if display_block {
        Ok(format!(
            "<m:oMathPara xmlns:m=\"{}\"><m:oMath>{}</m:oMath></m:oMathPara>",
            OMML_NS, body
        ))
    } else {
        Ok(format!("<m:oMath xmlns:m=\"{}\">{}</m:oMath>", OMML_NS, body))
    }
}

/// Parse a MathML string into an element tree.
fn parse_mathml(mathml: &str) -> Result<MathNode> {
    let reader = EventReader::new(mathml.as_bytes());

    // Sentinel root; the <math> element becomes its only child.
    let mut stack: Vec<MathNode> = vec![MathNode {
        name: String::new(),
        attrs: Vec::new(),
        text: String::new(),
        children: Vec::new(),
    }];

    for event in reader {
        match event.map_err(|e| Error::Math(format!("invalid MathML: {}", e)))? {
            XmlEvent::StartElement {
                name, attributes, ..
            } => {
                stack.push(MathNode {
                    name: name.local_name,
                    attrs: attributes
                        .into_iter()
                        .map(|a| (a.name.local_name, a.value))
                        .collect(),
                    text: String::new(),
                    children: Vec::new(),
                });
            }
            XmlEvent::EndElement { .. } => {
                let node = stack.pop().expect("balanced element stack");
                stack
                    .last_mut()
                    .expect("sentinel root below every element")
                    .children
                    .push(node);
            }
            XmlEvent::Characters(text) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&text);
                }
            }
            _ => {}
        }
    }

    let mut sentinel = stack.pop().ok_or_else(|| {
        Error::Math("empty MathML document".to_string())
    })?;
    if !stack.is_empty() || sentinel.children.len() != 1 {
        return Err(Error::Math("unbalanced MathML document".to_string()));
    }
    Ok(sentinel.children.remove(0))
}

/// Emit all children of a node in order.
fn emit_children(node: &MathNode, out: &mut String) -> Result<()> {
    for child in &node.children {
        emit_node(child, out)?;
    }
    Ok(())
}

fn emit_node(node: &MathNode, out: &mut String) -> Result<()> {
    match node.name.as_str() {
        // Grouping elements contribute only their content.
        "math" | "mrow" | "mstyle" | "mpadded" | "semantics" => emit_children(node, out),

        "mi" | "mn" | "mo" | "mtext" | "ms" => {
            if node.children.is_empty() {
                emit_run(&node.text, out);
                Ok(())
            } else {
                emit_children(node, out)
            }
        }

        "mspace" => {
            emit_run(" ", out);
            Ok(())
        }

        "mfrac" => {
            let (num, den) = two_children(node)?;
            out.push_str("<m:f><m:num>");
            emit_node(num, out)?;
            out.push_str("</m:num><m:den>");
            emit_node(den, out)?;
            out.push_str("</m:den></m:f>");
            Ok(())
        }

        "msup" => {
            let (base, sup) = two_children(node)?;
            out.push_str("<m:sSup><m:e>");
            emit_node(base, out)?;
            out.push_str("</m:e><m:sup>");
            emit_node(sup, out)?;
            out.push_str("</m:sup></m:sSup>");
            Ok(())
        }

        "msub" => {
            let (base, sub) = two_children(node)?;
            out.push_str("<m:sSub><m:e>");
            emit_node(base, out)?;
            out.push_str("</m:e><m:sub>");
            emit_node(sub, out)?;
            out.push_str("</m:sub></m:sSub>");
            Ok(())
        }

        "msubsup" => {
            let [base, sub, sup] = three_children(node)?;
            out.push_str("<m:sSubSup><m:e>");
            emit_node(base, out)?;
            out.push_str("</m:e><m:sub>");
            emit_node(sub, out)?;
            out.push_str("</m:sub><m:sup>");
            emit_node(sup, out)?;
            out.push_str("</m:sup></m:sSubSup>");
            Ok(())
        }

        "msqrt" => {
            out.push_str("<m:rad><m:radPr><m:degHide m:val=\"1\"/></m:radPr><m:deg/><m:e>");
            emit_children(node, out)?;
            out.push_str("</m:e></m:rad>");
            Ok(())
        }

        "mroot" => {
            let (base, degree) = two_children(node)?;
            out.push_str("<m:rad><m:deg>");
            emit_node(degree, out)?;
            out.push_str("</m:deg><m:e>");
            emit_node(base, out)?;
            out.push_str("</m:e></m:rad>");
            Ok(())
        }

        "munder" => {
            let (base, under) = two_children(node)?;
            out.push_str("<m:limLow><m:e>");
            emit_node(base, out)?;
            out.push_str("</m:e><m:lim>");
            emit_node(under, out)?;
            out.push_str("</m:lim></m:limLow>");
            Ok(())
        }

        "mover" => {
            let (base, over) = two_children(node)?;
            out.push_str("<m:limUpp><m:e>");
            emit_node(base, out)?;
            out.push_str("</m:e><m:lim>");
            emit_node(over, out)?;
            out.push_str("</m:lim></m:limUpp>");
            Ok(())
        }

        "munderover" => {
            let [base, under, over] = three_children(node)?;
            out.push_str("<m:limUpp><m:e><m:limLow><m:e>");
            emit_node(base, out)?;
            out.push_str("</m:e><m:lim>");
            emit_node(under, out)?;
            out.push_str("</m:lim></m:limLow></m:e><m:lim>");
            emit_node(over, out)?;
            out.push_str("</m:lim></m:limUpp>");
            Ok(())
        }

        "mfenced" => {
            let open = node.attr("open").unwrap_or("(");
            let close = node.attr("close").unwrap_or(")");
            out.push_str(&format!(
                "<m:d><m:dPr><m:begChr m:val=\"{}\"/><m:endChr m:val=\"{}\"/></m:dPr><m:e>",
                xml_escape_attr(open),
                xml_escape_attr(close)
            ));
            emit_children(node, out)?;
            out.push_str("</m:e></m:d>");
            Ok(())
        }

        "mtable" => {
            out.push_str("<m:m>");
            for row in &node.children {
                if row.name != "mtr" {
                    return Err(Error::Math(format!(
                        "unexpected element <{}> inside mtable",
                        row.name
                    )));
                }
                out.push_str("<m:mr>");
                for cell in &row.children {
                    out.push_str("<m:e>");
                    if cell.name == "mtd" {
                        emit_children(cell, out)?;
                    } else {
                        emit_node(cell, out)?;
                    }
                    out.push_str("</m:e>");
                }
                out.push_str("</m:mr>");
            }
            out.push_str("</m:m>");
            Ok(())
        }

        other => Err(Error::Math(format!(
            "unsupported MathML element <{}>",
            other
        ))),
    }
}

fn emit_run(text: &str, out: &mut String) {
    out.push_str("<m:r><m:t>");
    out.push_str(&xml_escape_text(text));
    out.push_str("</m:t></m:r>");
}

fn two_children(node: &MathNode) -> Result<(&MathNode, &MathNode)> {
    if node.children.len() != 2 {
        return Err(Error::Math(format!(
            "<{}> expects 2 children, found {}",
            node.name,
            node.children.len()
        )));
    }
    Ok((&node.children[0], &node.children[1]))
}

fn three_children(node: &MathNode) -> Result<[&MathNode; 3]> {
    if node.children.len() != 3 {
        return Err(Error::Math(format!(
            "<{}> expects 3 children, found {}",
            node.name,
            node.children.len()
        )));
    }
    Ok([&node.children[0], &node.children[1], &node.children[2]])
}

fn xml_escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn xml_escape_attr(s: &str) -> String {
    xml_escape_text(s).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_identifier() {
        let mathml = r#"<math xmlns="http://www.w3.org/1998/Math/MathML"><mi>x</mi></math>"#;
        let omml = mathml_to_omml(mathml, false).unwrap();
        assert!(omml.starts_with("<m:oMath"));
        assert!(omml.contains("<m:r><m:t>x</m:t></m:r>"));
    }

    #[test]
    fn test_fraction() {
        let mathml = r#"<math><mfrac><mn>1</mn><mn>2</mn></mfrac></math>"#;
        let omml = mathml_to_omml(mathml, false).unwrap();
        assert!(omml.contains("<m:f><m:num>"));
        assert!(omml.contains("<m:den>"));
    }

    #[test]
    fn test_superscript_and_subscript() {
        let mathml = r#"<math><msup><mi>x</mi><mn>2</mn></msup><msub><mi>a</mi><mn>0</mn></msub></math>"#;
        let omml = mathml_to_omml(mathml, false).unwrap();
        assert!(omml.contains("<m:sSup>"));
        assert!(omml.contains("<m:sSub>"));
    }

    #[test]
    fn test_sqrt_hides_degree() {
        let mathml = r#"<math><msqrt><mi>x</mi></msqrt></math>"#;
        let omml = mathml_to_omml(mathml, false).unwrap();
        assert!(omml.contains("<m:degHide m:val=\"1\"/>"));
    }

    #[test]
    fn test_block_wraps_in_math_para() {
        let mathml = r#"<math><mi>x</mi></math>"#;
        let omml = mathml_to_omml(mathml, true).unwrap();
        assert!(omml.starts_with("<m:oMathPara"));
        assert!(omml.contains("<m:oMath>"));
    }

    #[test]
    fn test_unsupported_element_is_error() {
        let mathml = r#"<math><maction><mi>x</mi></maction></math>"#;
        assert!(mathml_to_omml(mathml, false).is_err());
    }

    #[test]
    fn test_malformed_xml_is_error() {
        assert!(mathml_to_omml("<math><mi>x</math>", false).is_err());
        assert!(mathml_to_omml("", false).is_err());
    }

    #[test]
    fn test_operator_text_is_escaped() {
        let mathml = r#"<math><mo>&lt;</mo></math>"#;
        let omml = mathml_to_omml(mathml, false).unwrap();
        assert!(omml.contains("<m:t>&lt;</m:t>"));
    }

    #[test]
    fn test_matrix() {
        let mathml = r#"<math><mtable><mtr><mtd><mn>1</mn></mtd><mtd><mn>0</mn></mtd></mtr><mtr><mtd><mn>0</mn></mtd><mtd><mn>1</mn></mtd></mtr></mtable></math>"#;
        let omml = mathml_to_omml(mathml, false).unwrap();
        assert!(omml.contains("<m:m>"));
        assert_eq!(omml.matches("<m:mr>").count(), 2);
        assert_eq!(omml.matches("<m:e>").count(), 4);
    }
}
