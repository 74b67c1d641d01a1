//! Kind-directed dispatch over tree nodes
//!
//! [`Visitor`] has one method per concrete [`NodeKind`], each defaulting to
//! [`Visitor::visit_default`]. Implementors override the kinds they care
//! about; [`accept`] routes a node to the right method.

use super::{Ast, NodeId, NodeKind};

macro_rules! define_visitor {
    ($(
        $kind:ident : $cat:ident => $visit:ident {
            $($prop:ident : $shape:ident ( $($arg:tt)* )),* $(,)?
        }
    )*) => {
        pub trait Visitor {
            type Output;

            /// Fallback for every kind without its own handler
            fn visit_default(&mut self, ast: &Ast, node: NodeId) -> Self::Output;

            $(
                fn $visit(&mut self, ast: &Ast, node: NodeId) -> Self::Output {
                    self.visit_default(ast, node)
                }
            )*
        }

        /// Dispatch `node` to the handler for its kind
        pub fn accept<V: Visitor + ?Sized>(visitor: &mut V, ast: &Ast, node: NodeId) -> V::Output {
            match ast.kind(node) {
                $(NodeKind::$kind => visitor.$visit(ast, node),)*
            }
        }
    };
}

super::with_node_kinds!(define_visitor);

/// Visit `node` and then, depth first, everything below it
///
/// Attached comments are visited right before the node they belong to.
pub fn walk<V>(visitor: &mut V, ast: &Ast, node: NodeId)
where
    V: Visitor<Output = ()> + ?Sized,
{
    if let Some(comment) = ast.node(node).comment() {
        accept(visitor, ast, comment);
    }
    accept(visitor, ast, node);
    for child in ast.children(node) {
        walk(visitor, ast, child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Property;

    #[derive(Default)]
    struct Names {
        names: Vec<String>,
        others: usize,
    }

    impl Visitor for Names {
        type Output = ();

        fn visit_default(&mut self, _ast: &Ast, _node: NodeId) {
            self.others += 1;
        }

        fn visit_simple_name(&mut self, ast: &Ast, node: NodeId) {
            if let Some(text) = ast.text(node, Property::Identifier) {
                self.names.push(text.to_string());
            }
        }
    }

    #[test]
    fn dispatches_by_kind_with_fallback() {
        let mut ast = Ast::new();
        let a = ast.name_expr("a");
        let b = ast.name_expr("b");
        let name = ast.simple_name("call");
        let call = ast
            .build(NodeKind::MethodCallExpr)
            .child(Property::Scope, a)
            .child(Property::Name, name)
            .list(Property::Arguments, [b])
            .finish()
            .unwrap();

        let mut names = Names::default();
        walk(&mut names, &ast, call);
        assert_eq!(names.names, ["a", "call", "b"]);
        assert_eq!(names.others, 3);
    }
}
