//! # Program Loader / Validator
//!
//! Turns an XML document into a [`Program`], enforcing every structural
//! rule before the engine ever sees an instruction. Parsing itself is
//! done with `roxmltree`, a non-validating, read-only DOM — a good fit
//! here since the document is read once, top to bottom, and discarded.
//!
//! Three error buckets, matched to the exit-code table:
//! - malformed XML (not well-formed) → [`EngineError::Xml`]
//! - a well-formed document that violates the instruction schema, or a
//!   literal that fails to parse for its declared type → [`EngineError::Structure`]
//! - a recognized `type` attribute that isn't admissible at its
//!   positional slot → [`EngineError::Type`]

use std::collections::HashMap;

use roxmltree::Document;

use crate::decode::decode;
use crate::error::EngineError;
use crate::frame::{FrameKind, VarRef};
use crate::program::{Arg, ArgKind, ArgShape, Instruction, Opcode, Program};
use crate::value::{Tag, Value};

/// Parse and validate an XML document, producing an ordered, label-indexed
/// [`Program`].
pub fn load(xml: &str) -> Result<Program, EngineError> {
    let doc = Document::parse(xml).map_err(|e| EngineError::Xml(e.to_string()))?;
    let root = doc.root_element();

    if root.tag_name().name() != "program" {
        return Err(EngineError::Structure(format!(
            "root element must be <program>, found <{}>",
            root.tag_name().name()
        )));
    }

    let language = root
        .attribute("language")
        .ok_or_else(|| EngineError::Structure("missing 'language' attribute".to_string()))?;
    if !language.eq_ignore_ascii_case("IPPcode23") {
        return Err(EngineError::Structure(format!(
            "unsupported language '{}'",
            language
        )));
    }
    for attr in root.attributes() {
        let name = attr.name();
        if name != "language" && name != "name" && name != "description" {
            return Err(EngineError::Structure(format!(
                "unexpected root attribute '{}'",
                name
            )));
        }
    }

    let mut ordered: Vec<(i64, Instruction)> = Vec::new();
    for child in root.children().filter(|n| n.is_element()) {
        ordered.push(parse_instruction(&child)?);
    }

    let mut seen_orders = std::collections::HashSet::new();
    for (order, _) in &ordered {
        if *order <= 0 {
            return Err(EngineError::Structure(format!(
                "instruction order must be positive, found {}",
                order
            )));
        }
        if !seen_orders.insert(*order) {
            return Err(EngineError::Structure(format!(
                "duplicate instruction order {}",
                order
            )));
        }
    }
    ordered.sort_by_key(|(order, _)| *order);

    let instructions: Vec<Instruction> = ordered.into_iter().map(|(_, i)| i).collect();

    let mut labels: HashMap<String, usize> = HashMap::new();
    for (idx, instr) in instructions.iter().enumerate() {
        if instr.opcode == Opcode::Label {
            let name = match &instr.args[0].kind {
                ArgKind::Label(name) => name.clone(),
                _ => unreachable!("LABEL's only argument is always a label"),
            };
            if labels.insert(name.clone(), idx).is_some() {
                return Err(EngineError::Semantic(format!(
                    "label '{}' defined more than once",
                    name
                )));
            }
        }
    }

    Ok(Program { instructions, labels })
}

fn parse_instruction(node: &roxmltree::Node<'_, '_>) -> Result<(i64, Instruction), EngineError> {
    if node.tag_name().name() != "instruction" {
        return Err(EngineError::Structure(format!(
            "expected <instruction>, found <{}>",
            node.tag_name().name()
        )));
    }

    let opcode_name = node
        .attribute("opcode")
        .ok_or_else(|| EngineError::Structure("<instruction> missing 'opcode'".to_string()))?;
    let order_text = node
        .attribute("order")
        .ok_or_else(|| EngineError::Structure("<instruction> missing 'order'".to_string()))?;
    let order: i64 = order_text.parse().map_err(|_| {
        EngineError::Structure(format!("instruction order '{}' is not an integer", order_text))
    })?;

    let opcode = Opcode::from_name(opcode_name)
        .ok_or_else(|| EngineError::Structure(format!("unknown opcode '{}'", opcode_name)))?;

    let arity = opcode.arity();
    let mut positional: Vec<Option<roxmltree::Node<'_, '_>>> = vec![None; arity.max(3)];
    let mut max_seen = 0usize;
    for child in node.children().filter(|n| n.is_element()) {
        let name = child.tag_name().name();
        let pos = match name {
            "arg1" => 1,
            "arg2" => 2,
            "arg3" => 3,
            other => {
                return Err(EngineError::Structure(format!(
                    "unexpected argument element <{}>",
                    other
                )))
            }
        };
        if pos > positional.len() || positional[pos - 1].is_some() {
            return Err(EngineError::Structure(format!(
                "duplicate or out-of-range argument '{}'",
                name
            )));
        }
        positional[pos - 1] = Some(child);
        max_seen = max_seen.max(pos);
    }
    if max_seen != arity {
        return Err(EngineError::Structure(format!(
            "{} expects {} argument(s), found {}",
            opcode_name, arity, max_seen
        )));
    }
    for slot in &positional[..arity] {
        if slot.is_none() {
            return Err(EngineError::Structure(format!(
                "{} has a gap in its argument positions",
                opcode_name
            )));
        }
    }

    let shapes = arg_shapes(opcode);
    let mut args = Vec::with_capacity(arity);
    for (node, shape) in positional[..arity].iter().map(|n| n.unwrap()).zip(shapes) {
        args.push(parse_arg(&node, *shape)?);
    }

    Ok((order, Instruction { opcode, args }))
}

fn parse_arg(node: &roxmltree::Node<'_, '_>, shape: ArgShape) -> Result<Arg, EngineError> {
    let type_attr = node
        .attribute("type")
        .ok_or_else(|| EngineError::Structure("argument missing 'type' attribute".to_string()))?;
    let raw_text = node.text().unwrap_or("");

    let kind = match type_attr {
        "var" => {
            if shape != ArgShape::Var && shape != ArgShape::Symb {
                return Err(EngineError::Type(format!(
                    "a 'var' argument is not admitted here"
                )));
            }
            ArgKind::Var(parse_var_ref(raw_text.trim())?)
        }
        "label" => {
            if shape != ArgShape::Label {
                return Err(EngineError::Type(
                    "a 'label' argument is not admitted here".to_string(),
                ));
            }
            let text = raw_text.trim();
            if text.is_empty() {
                return Err(EngineError::Structure("empty label name".to_string()));
            }
            ArgKind::Label(text.to_string())
        }
        "type" => {
            if shape != ArgShape::TypeTag {
                return Err(EngineError::Type(
                    "a 'type' argument is not admitted here".to_string(),
                ));
            }
            let text = raw_text.trim();
            let tag = match text {
                "int" | "string" | "bool" => Tag::from_name(text).unwrap(),
                _ => {
                    return Err(EngineError::Structure(format!(
                        "'{}' is not a valid type tag",
                        text
                    )))
                }
            };
            ArgKind::Type(tag)
        }
        "int" => {
            if shape != ArgShape::Symb {
                return Err(EngineError::Type("an 'int' literal is not admitted here".to_string()));
            }
            let text = raw_text.trim();
            let n: i64 = text
                .parse()
                .map_err(|_| EngineError::Structure(format!("'{}' is not a valid int", text)))?;
            ArgKind::Literal(Value::Int(n))
        }
        "bool" => {
            if shape != ArgShape::Symb {
                return Err(EngineError::Type("a 'bool' literal is not admitted here".to_string()));
            }
            let text = raw_text.trim();
            let b = match text {
                "true" => true,
                "false" => false,
                _ => {
                    return Err(EngineError::Structure(format!(
                        "'{}' is not a valid bool",
                        text
                    )))
                }
            };
            ArgKind::Literal(Value::Bool(b))
        }
        "nil" => {
            if shape != ArgShape::Symb {
                return Err(EngineError::Type("a 'nil' literal is not admitted here".to_string()));
            }
            let text = raw_text.trim();
            if text != "nil" {
                return Err(EngineError::Structure(format!("'{}' is not 'nil'", text)));
            }
            ArgKind::Literal(Value::Nil)
        }
        "string" => {
            if shape != ArgShape::Symb {
                return Err(EngineError::Type(
                    "a 'string' literal is not admitted here".to_string(),
                ));
            }
            // No trimming: string literal text is used verbatim (spec: raw
            // text decoded by the string decoder, not whitespace-stripped).
            ArgKind::Literal(Value::Str(decode(raw_text)))
        }
        other => {
            return Err(EngineError::Structure(format!(
                "'{}' is not a valid argument type",
                other
            )))
        }
    };

    Ok(Arg { kind })
}

fn parse_var_ref(text: &str) -> Result<VarRef, EngineError> {
    let (prefix, name) = text
        .split_once('@')
        .ok_or_else(|| EngineError::Structure(format!("'{}' is not a valid variable reference", text)))?;
    let frame = FrameKind::from_prefix(prefix)
        .ok_or_else(|| EngineError::Structure(format!("unknown frame prefix '{}'", prefix)))?;
    if name.is_empty() {
        return Err(EngineError::Structure("variable reference has an empty name".to_string()));
    }
    Ok(VarRef { frame, name: name.to_string() })
}

/// The admissible syntactic category of each of an opcode's arguments,
/// in positional order.
fn arg_shapes(opcode: Opcode) -> &'static [ArgShape] {
    use ArgShape::*;
    use Opcode::*;
    match opcode {
        CreateFrame | PushFrame | PopFrame | Return | Break | ClearS | AddS | SubS | MulS
        | IDivS | LtS | GtS | EqS | AndS | OrS | NotS | Int2CharS | Stri2IntS => &[],
        DefVar | PopS => &[Var],
        Call | Label | Jump | JumpIfEqS | JumpIfNeqS => &[Label],
        PushS | Write | Exit | DPrint => &[Symb],
        Move | Not | Int2Char | StrLen | Type => &[Var, Symb],
        Read => &[Var, TypeTag],
        Add | Sub | Mul | IDiv | Lt | Gt | Eq | And | Or | Stri2Int | Concat | GetChar
        | SetChar => &[Var, Symb, Symb],
        JumpIfEq | JumpIfNeq => &[Label, Symb, Symb],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WRAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<program language="IPPcode23">
{}
</program>"#;

    fn load_body(body: &str) -> Result<Program, EngineError> {
        load(&WRAP.replace("{}", body))
    }

    #[test]
    fn rejects_wrong_language() {
        let xml = r#"<program language="notippcode"></program>"#;
        assert!(matches!(load(xml), Err(EngineError::Structure(_))));
    }

    #[test]
    fn rejects_unknown_root_attribute() {
        let xml = r#"<program language="IPPcode23" bogus="x"></program>"#;
        assert!(matches!(load(xml), Err(EngineError::Structure(_))));
    }

    #[test]
    fn loads_a_minimal_program() {
        let body = r#"
            <instruction order="1" opcode="DEFVAR"><arg1 type="var">GF@x</arg1></instruction>
            <instruction order="2" opcode="MOVE">
                <arg1 type="var">GF@x</arg1>
                <arg2 type="int">42</arg2>
            </instruction>
        "#;
        let program = load_body(body).unwrap();
        assert_eq!(program.instructions.len(), 2);
    }

    #[test]
    fn detects_duplicate_label() {
        let body = r#"
            <instruction order="1" opcode="LABEL"><arg1 type="label">l</arg1></instruction>
            <instruction order="2" opcode="LABEL"><arg1 type="label">l</arg1></instruction>
        "#;
        assert!(matches!(load_body(body), Err(EngineError::Semantic(_))));
    }

    #[test]
    fn detects_argument_position_gap() {
        let body = r#"
            <instruction order="1" opcode="MOVE">
                <arg1 type="var">GF@x</arg1>
                <arg3 type="int">1</arg3>
            </instruction>
        "#;
        assert!(matches!(load_body(body), Err(EngineError::Structure(_))));
    }

    #[test]
    fn rejects_type_mismatched_to_positional_slot() {
        let body = r#"
            <instruction order="1" opcode="MOVE">
                <arg1 type="int">1</arg1>
                <arg2 type="int">1</arg2>
            </instruction>
        "#;
        assert!(matches!(load_body(body), Err(EngineError::Type(_))));
    }
}
