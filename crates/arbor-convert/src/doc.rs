//! Comment table construction and doc-comment attachment.
//!
//! Every comment scanned from the source becomes a public comment node in
//! the unit's comment table. Doc comments additionally parse into a tag
//! structure (an unnamed leading description tag followed by one tag per
//! `@name` line) and attach to the declaration whose internal node anchors
//! them by start offset. The attached node and the table entry are the same
//! node.

use arbor_common::{CommentRange, SourceRange, doc_content};
use arbor_dom::{NodeFlags, NodeId, NodeKind, SimpleProperty, SimpleValue, StructuralProperty};

use crate::{ConvertError, Converter};

impl Converter<'_, '_> {
    /// Attach the doc comment whose `/**` sits at `anchor` to `node`'s doc
    /// slot. A stale or missing anchor attaches nothing.
    pub(crate) fn attach_doc(
        &mut self,
        node: NodeId,
        anchor: Option<u32>,
    ) -> Result<(), ConvertError> {
        let Some(anchor) = anchor else {
            return Ok(());
        };
        let Some(comment) = self
            .comments
            .iter()
            .find(|c| c.is_doc && c.start == anchor)
            .cloned()
        else {
            return Ok(());
        };
        let doc = self.doc_comment_node(&comment)?;
        self.ast
            .set_child(node, StructuralProperty::Doc, Some(doc))?;
        Ok(())
    }

    /// Populate the unit's comment table from the scanned ranges.
    pub(crate) fn build_comment_table(&mut self, root: NodeId) -> Result<(), ConvertError> {
        if self.comments.is_empty() {
            return Ok(());
        }
        let comments = self.comments.clone();
        let mut table = Vec::with_capacity(comments.len());
        for comment in &comments {
            let node = if comment.is_doc {
                self.doc_comment_node(comment)?
            } else {
                let kind = if comment.is_block {
                    NodeKind::BlockComment
                } else {
                    NodeKind::LineComment
                };
                let node = self.ast.new_node(kind)?;
                self.ast.set_source_range(
                    node,
                    SourceRange::from_inclusive(comment.start, comment.end - 1),
                )?;
                self.ast.add_flags(node, NodeFlags::ORIGINAL)?;
                node
            };
            table.push(node);
        }
        self.ast.set_unit_comments(root, table)?;
        Ok(())
    }

    fn doc_comment_node(&mut self, comment: &CommentRange) -> Result<NodeId, ConvertError> {
        if let Some(&existing) = self.doc_nodes.get(&comment.start) {
            return Ok(existing);
        }
        let node = self.ast.new_node(NodeKind::DocComment)?;
        let raw = comment.text(self.source).to_string();
        self.ast.set_value(
            node,
            SimpleProperty::CommentText,
            SimpleValue::Str(raw.clone()),
        )?;
        self.parse_doc_tags(node, &raw)?;
        self.ast.set_source_range(
            node,
            SourceRange::from_inclusive(comment.start, comment.end - 1),
        )?;
        self.ast.add_flags(node, NodeFlags::ORIGINAL)?;
        self.doc_nodes.insert(comment.start, node);
        Ok(node)
    }

    fn parse_doc_tags(&mut self, doc: NodeId, raw: &str) -> Result<(), ConvertError> {
        let content = doc_content(raw);
        let mut description: Vec<&str> = Vec::new();
        let mut tags: Vec<(String, String)> = Vec::new();
        for line in content.lines() {
            let trimmed = line.trim();
            if let Some(rest) = trimmed.strip_prefix('@') {
                let (name, text) = match rest.split_once(char::is_whitespace) {
                    Some((n, t)) => (n, t.trim()),
                    None => (rest, ""),
                };
                tags.push((format!("@{name}"), text.to_string()));
            } else if let Some((_, text)) = tags.last_mut() {
                // Continuation line of the previous tag.
                if !trimmed.is_empty() {
                    if !text.is_empty() {
                        text.push(' ');
                    }
                    text.push_str(trimmed);
                }
            } else if !trimmed.is_empty() {
                description.push(trimmed);
            }
        }
        if !description.is_empty() {
            let element = self.tag_element(None, &description.join(" "))?;
            self.push_child(doc, StructuralProperty::Tags, element)?;
        }
        for (name, text) in tags {
            let element = self.tag_element(Some(name), &text)?;
            self.push_child(doc, StructuralProperty::Tags, element)?;
        }
        Ok(())
    }

    fn tag_element(
        &mut self,
        tag_name: Option<String>,
        text: &str,
    ) -> Result<NodeId, ConvertError> {
        let named = tag_name.is_some();
        let tag = self.ast.new_node(NodeKind::TagElement)?;
        self.ast
            .set_value(tag, SimpleProperty::TagName, SimpleValue::OptStr(tag_name))?;
        let mut rest = text;
        if named {
            let (first, remainder) = split_reference_token(text);
            if let Some(reference) = self.reference_fragment(first)? {
                self.push_child(tag, StructuralProperty::Fragments, reference)?;
                rest = remainder;
            }
        }
        if !rest.is_empty() {
            let fragment = self.ast.new_node(NodeKind::TextElement)?;
            self.ast.set_value(
                fragment,
                SimpleProperty::Text,
                SimpleValue::Str(rest.to_string()),
            )?;
            self.push_child(tag, StructuralProperty::Fragments, fragment)?;
        }
        Ok(tag)
    }

    /// `Type#member` and `Type#member(params)` tokens in tag text become
    /// structured references instead of plain text. Anything that does not
    /// scan as a reference stays in the text fragment.
    fn reference_fragment(&mut self, token: &str) -> Result<Option<NodeId>, ConvertError> {
        let Some((qualifier, member)) = token.split_once('#') else {
            return Ok(None);
        };
        if !qualifier.is_empty() && !qualifier.split('.').all(is_doc_identifier) {
            return Ok(None);
        }
        if let Some((selector, params)) = member.split_once('(') {
            let Some(params) = params.strip_suffix(')') else {
                return Ok(None);
            };
            if !is_doc_identifier(selector) {
                return Ok(None);
            }
            let qualifier = if qualifier.is_empty() {
                None
            } else {
                Some(self.doc_name_path(qualifier)?)
            };
            let node = self.ast.new_node(NodeKind::FunctionRef)?;
            self.ast
                .set_child(node, StructuralProperty::Qualifier, qualifier)?;
            let name = self.doc_name(selector)?;
            self.set_child(node, StructuralProperty::Name, name)?;
            for param in params.split(',') {
                let param = param.trim();
                if param.is_empty() {
                    continue;
                }
                let parameter = self.ast.new_node(NodeKind::FunctionRefParameter)?;
                let (type_token, name_token) = match param.split_once(char::is_whitespace) {
                    Some((t, n)) => (t, Some(n.trim())),
                    None => (param, None),
                };
                let param_type = self.ast.new_node(NodeKind::SimpleType)?;
                let type_name = self.doc_name(type_token)?;
                self.set_child(param_type, StructuralProperty::Name, type_name)?;
                self.set_child(parameter, StructuralProperty::ParamType, param_type)?;
                if let Some(name_token) = name_token {
                    let param_name = self.doc_name(name_token)?;
                    self.set_child(parameter, StructuralProperty::Name, param_name)?;
                }
                self.push_child(node, StructuralProperty::Parameters, parameter)?;
            }
            Ok(Some(node))
        } else {
            if !is_doc_identifier(member) {
                return Ok(None);
            }
            let qualifier = if qualifier.is_empty() {
                None
            } else {
                Some(self.doc_name_path(qualifier)?)
            };
            let node = self.ast.new_node(NodeKind::MemberRef)?;
            self.ast
                .set_child(node, StructuralProperty::Qualifier, qualifier)?;
            let name = self.doc_name(member)?;
            self.set_child(node, StructuralProperty::Name, name)?;
            Ok(Some(node))
        }
    }

    /// A name inside a doc reference. Doc-internal names carry no source
    /// range of their own.
    fn doc_name(&mut self, identifier: &str) -> Result<NodeId, ConvertError> {
        let node = self.ast.new_node(NodeKind::SimpleName)?;
        self.ast.set_value(
            node,
            SimpleProperty::Identifier,
            SimpleValue::Str(identifier.to_string()),
        )?;
        Ok(node)
    }

    fn doc_name_path(&mut self, path: &str) -> Result<NodeId, ConvertError> {
        let mut parts = path.split('.');
        let mut acc = match parts.next() {
            Some(first) => self.doc_name(first)?,
            None => return self.doc_name(path),
        };
        for part in parts {
            let qualified = self.ast.new_node(NodeKind::QualifiedName)?;
            self.ast
                .set_child(qualified, StructuralProperty::Qualifier, Some(acc))?;
            let name = self.doc_name(part)?;
            self.set_child(qualified, StructuralProperty::Name, name)?;
            acc = qualified;
        }
        Ok(acc)
    }
}

/// First whitespace-delimited token of tag text, except that an open
/// parameter list keeps everything up to its closing paren in one token.
fn split_reference_token(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((first, remainder)) => {
            if first.contains('(') && !first.contains(')') {
                if let Some(close) = text.find(')') {
                    let (token, rest) = text.split_at(close + 1);
                    return (token, rest.trim());
                }
            }
            (first, remainder.trim())
        }
        None => (text, ""),
    }
}

fn is_doc_identifier(token: &str) -> bool {
    !token.is_empty()
        && !token.starts_with(|c: char| c.is_ascii_digit())
        && token
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
