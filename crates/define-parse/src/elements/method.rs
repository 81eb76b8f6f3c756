//! `MethodDef` and `def:CommentDef`.

use define_model::{Comment, CommentBody, FormalExpression, Method, OidKind};

use super::ParseContext;
use super::common::{documents, required_descriptions};
use crate::error::Result;
use crate::tree::XmlNode;

fn body(node: &XmlNode, ctx: &mut ParseContext<'_>) -> Result<CommentBody> {
    Ok(CommentBody {
        descriptions: required_descriptions(node, ctx)?,
        documents: documents(node)?,
    })
}

pub(crate) fn parse_method(node: &XmlNode, ctx: &mut ParseContext<'_>) -> Result<Method> {
    let oid = ctx.claim(OidKind::Method, node.required_attr("oid")?)?;
    let mut method = Method::new(oid, node.required_attr("name")?);
    method.method_type = node.attr("type").map(str::to_string);
    method.body = body(node, ctx)?;
    method.formal_expressions = node
        .children("FormalExpression")
        .iter()
        .map(|expression| FormalExpression {
            context: expression.attr("context").map(str::to_string),
            value: expression.text().unwrap_or_default().to_string(),
        })
        .collect();
    Ok(method)
}

pub(crate) fn parse_comment(node: &XmlNode, ctx: &mut ParseContext<'_>) -> Result<Comment> {
    let oid = ctx.claim(OidKind::Comment, node.required_attr("oid")?)?;
    let mut comment = Comment::new(oid);
    comment.body = body(node, ctx)?;
    Ok(comment)
}
