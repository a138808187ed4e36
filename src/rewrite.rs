use swc_core::{
    common::{Span, Spanned, SyntaxContext, DUMMY_SP},
    ecma::ast::*,
};
use tracing::debug;

use crate::{
    config::{IfTitleFound, NonObjectPolicy},
    error::TitleError,
    locate::{object_lit_mut, DefaultExport, NonObjectForm, TransformState},
    title::TitleResolver,
};

const TITLE_KEY: &str = "title";
const COMPONENT_KEY: &str = "component";

/// Which rewrite a pass committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No default export existed; `export default { title }` was appended.
    Inserted,
    /// `title` was appended to the existing object.
    Appended,
    /// An existing `title` was overwritten.
    Replaced,
    /// An existing `title` was left alone.
    Skipped,
    /// The default export moved to a named export.
    Renamed { to: String },
    /// The default export became the meta object's `component`.
    Wrapped,
}

// -----------------------------------------------------------------------------
// Decision table
// -----------------------------------------------------------------------------

impl TransformState<'_> {
    /// Resolves the title and applies the single rewrite for this module.
    ///
    /// Takes `self` by value: a located state commits at most once.
    pub fn finalize(
        self,
        module: &mut Module,
        resolver: &dyn TitleResolver,
    ) -> Result<Outcome, TitleError> {
        let title = resolver.resolve(&self);

        let outcome = match self.default_export {
            DefaultExport::Absent => {
                insert_default_export(module, title);
                Ok(Outcome::Inserted)
            }
            DefaultExport::Object { item } => self.fix_object_export(module, item, title),
            DefaultExport::NonObject { item, form } => {
                self.fix_non_object_export(module, item, form, title)
            }
        };

        if let Ok(outcome) = &outcome {
            debug!(
                filename = self.filename().unwrap_or("unknown"),
                ?outcome,
                "default export normalized"
            );
        }
        outcome
    }

    fn fix_object_export(
        &self,
        module: &mut Module,
        item: usize,
        title: String,
    ) -> Result<Outcome, TitleError> {
        let span = item_span(module, item);
        let Some(object) = module.body.get_mut(item).and_then(default_object_mut) else {
            return Err(TitleError::MissingProperties { span });
        };

        let Some(index) = object.props.iter().position(is_title_prop) else {
            object.props.push(key_value(TITLE_KEY, str_lit(title)));
            return Ok(Outcome::Appended);
        };

        match self.config().if_title_found {
            IfTitleFound::Strict => Err(TitleError::DuplicateTitle { span }),
            IfTitleFound::Skip => Ok(Outcome::Skipped),
            IfTitleFound::Transform => {
                object.props[index] = key_value(TITLE_KEY, str_lit(title));
                Ok(Outcome::Replaced)
            }
        }
    }

    fn fix_non_object_export(
        &self,
        module: &mut Module,
        item: usize,
        form: NonObjectForm,
        title: String,
    ) -> Result<Outcome, TitleError> {
        let span = item_span(module, item);

        match self.config().non_object_policy() {
            NonObjectPolicy::Reject => Err(TitleError::NonObjectExport { span }),
            NonObjectPolicy::Rename(target) => {
                if self.rename_target().is_some() {
                    return Err(TitleError::RenameConflict {
                        name: target.to_string(),
                        span,
                    });
                }
                let renamed = match form {
                    NonObjectForm::Specifier { specifier } => {
                        rename_specifier(module, item, specifier, target)
                    }
                    NonObjectForm::Expr | NonObjectForm::Decl => {
                        match take_default_value(module, item) {
                            Some(DefaultValue::Expr(value)) => {
                                module.body[item] = named_export(span, target, value);
                                true
                            }
                            Some(DefaultValue::AbstractClass(class)) => {
                                export_abstract_class(module, item, span, class, target);
                                true
                            }
                            None => false,
                        }
                    }
                };
                if !renamed {
                    return Err(TitleError::NonObjectExport { span });
                }
                insert_default_export(module, title);
                Ok(Outcome::Renamed {
                    to: target.to_string(),
                })
            }
            NonObjectPolicy::Wrap => {
                let meta = |component| {
                    meta_export(
                        span,
                        vec![
                            key_value(TITLE_KEY, str_lit(title)),
                            key_value(COMPONENT_KEY, component),
                        ],
                    )
                };
                match form {
                    NonObjectForm::Specifier { specifier } => {
                        // appended: the local binding may be declared after the specifier
                        let component = take_default_specifier(module, item, specifier)
                            .ok_or(TitleError::NonObjectExport { span })?;
                        module.body.push(meta(component));
                    }
                    NonObjectForm::Expr | NonObjectForm::Decl => {
                        match take_default_value(module, item)
                            .ok_or(TitleError::NonObjectExport { span })?
                        {
                            DefaultValue::Expr(component) => module.body[item] = meta(component),
                            DefaultValue::AbstractClass(ClassExpr {
                                ident: Some(local),
                                class,
                            }) => {
                                module.body[item] = class_decl(local.clone(), class);
                                module
                                    .body
                                    .insert(item + 1, meta(Box::new(Expr::Ident(local))));
                            }
                            // an anonymous abstract class has no name to reference
                            DefaultValue::AbstractClass(class) => {
                                module.body[item] =
                                    ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(
                                        ExportDefaultDecl {
                                            span,
                                            decl: DefaultDecl::Class(class),
                                        },
                                    ));
                                return Err(TitleError::NonObjectExport { span });
                            }
                        }
                    }
                }
                Ok(Outcome::Wrapped)
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Shared actions
// -----------------------------------------------------------------------------

/// Appends `export default { title: "<title>" }`.
fn insert_default_export(module: &mut Module, title: String) {
    module
        .body
        .push(meta_export(DUMMY_SP, vec![key_value(TITLE_KEY, str_lit(title))]));
}

fn item_span(module: &Module, item: usize) -> Span {
    module.body.get(item).map(|s| s.span()).unwrap_or(DUMMY_SP)
}

fn default_object_mut(stmt: &mut ModuleItem) -> Option<&mut ObjectLit> {
    match stmt {
        ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(e)) => object_lit_mut(&mut e.expr),
        _ => None,
    }
}

fn is_title_prop(prop: &PropOrSpread) -> bool {
    let PropOrSpread::Prop(prop) = prop else {
        return false;
    };
    match &**prop {
        Prop::Shorthand(ident) => ident.sym.as_ref() == TITLE_KEY,
        Prop::KeyValue(KeyValueProp { key, .. })
        | Prop::Method(MethodProp { key, .. })
        | Prop::Getter(GetterProp { key, .. })
        | Prop::Setter(SetterProp { key, .. }) => prop_name_is(key, TITLE_KEY),
        _ => false,
    }
}

fn prop_name_is(key: &PropName, name: &str) -> bool {
    match key {
        PropName::Ident(i) => i.sym.as_ref() == name,
        PropName::Str(s) => s.value.as_ref() == name,
        _ => false,
    }
}

enum DefaultValue {
    Expr(Box<Expr>),
    /// `abstract class` has no expression form and stays a declaration.
    AbstractClass(ClassExpr),
}

/// Moves the value out of `export default <expr>` / `export default function|class`.
///
/// Leaves the statement in place and returns `None` for any other shape.
fn take_default_value(module: &mut Module, item: usize) -> Option<DefaultValue> {
    let slot = module.body.get_mut(item)?;
    let empty = ModuleItem::Stmt(Stmt::Empty(EmptyStmt { span: DUMMY_SP }));
    let stmt = std::mem::replace(slot, empty);
    match stmt {
        ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(e)) => Some(DefaultValue::Expr(e.expr)),
        ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(ExportDefaultDecl {
            decl: DefaultDecl::Fn(f),
            ..
        })) => Some(DefaultValue::Expr(Box::new(Expr::Fn(f)))),
        ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(ExportDefaultDecl {
            decl: DefaultDecl::Class(c),
            ..
        })) => Some(if c.class.is_abstract {
            DefaultValue::AbstractClass(c)
        } else {
            DefaultValue::Expr(Box::new(Expr::Class(c)))
        }),
        other => {
            *slot = other;
            None
        }
    }
}

/// `export default abstract class Story {}` -> `abstract class Story {}` + `export { Story as <target> }`.
///
/// Anonymous (or already matching) classes are declared under the target name directly.
fn export_abstract_class(module: &mut Module, item: usize, span: Span, class: ClassExpr, target: &str) {
    match class.ident {
        Some(local) if local.sym.as_ref() != target => {
            module.body[item] = class_decl(local.clone(), class.class);
            module.body.insert(
                item + 1,
                ModuleItem::ModuleDecl(ModuleDecl::ExportNamed(NamedExport {
                    span,
                    specifiers: vec![ExportSpecifier::Named(ExportNamedSpecifier {
                        span: DUMMY_SP,
                        orig: ModuleExportName::Ident(local),
                        exported: Some(ModuleExportName::Ident(ident(target))),
                        is_type_only: false,
                    })],
                    src: None,
                    type_only: false,
                    with: None,
                })),
            );
        }
        _ => {
            module.body[item] = ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
                span,
                decl: Decl::Class(ClassDecl {
                    ident: ident(target),
                    declare: false,
                    class: class.class,
                }),
            }));
        }
    }
}

/// `export { x as default }` -> `export { x as <target> }`
fn rename_specifier(module: &mut Module, item: usize, specifier: usize, target: &str) -> bool {
    let Some(ModuleItem::ModuleDecl(ModuleDecl::ExportNamed(named))) = module.body.get_mut(item)
    else {
        return false;
    };
    let Some(ExportSpecifier::Named(spec)) = named.specifiers.get_mut(specifier) else {
        return false;
    };
    spec.exported = Some(ModuleExportName::Ident(ident(target)));
    true
}

/// Removes a local `x as default` specifier and returns `x` as an expression.
///
/// Re-exports have no local binding to wrap and yield `None`.
fn take_default_specifier(module: &mut Module, item: usize, specifier: usize) -> Option<Box<Expr>> {
    let Some(ModuleItem::ModuleDecl(ModuleDecl::ExportNamed(named))) = module.body.get_mut(item)
    else {
        return None;
    };
    if named.src.is_some() {
        return None;
    }
    let local = match named.specifiers.get(specifier)? {
        ExportSpecifier::Named(ExportNamedSpecifier {
            orig: ModuleExportName::Ident(local),
            ..
        }) => local.clone(),
        _ => return None,
    };
    named.specifiers.remove(specifier);
    let emptied = named.specifiers.is_empty();
    if emptied {
        module.body.remove(item);
    }
    Some(Box::new(Expr::Ident(local)))
}

// -----------------------------------------------------------------------------
// Node builders
// -----------------------------------------------------------------------------

fn ident(name: &str) -> Ident {
    Ident::new(name.into(), DUMMY_SP, SyntaxContext::empty())
}

fn str_lit(value: String) -> Box<Expr> {
    Box::new(Expr::Lit(Lit::Str(Str {
        span: DUMMY_SP,
        value: value.into(),
        raw: None,
    })))
}

fn key_value(key: &str, value: Box<Expr>) -> PropOrSpread {
    PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
        key: PropName::Ident(IdentName::new(key.into(), DUMMY_SP)),
        value,
    })))
}

fn meta_export(span: Span, props: Vec<PropOrSpread>) -> ModuleItem {
    ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(ExportDefaultExpr {
        span,
        expr: Box::new(Expr::Object(ObjectLit {
            span: DUMMY_SP,
            props,
        })),
    }))
}

fn class_decl(ident: Ident, class: Box<Class>) -> ModuleItem {
    ModuleItem::Stmt(Stmt::Decl(Decl::Class(ClassDecl {
        ident,
        declare: false,
        class,
    })))
}

/// `export const <name> = <value>;`
fn named_export(span: Span, name: &str, value: Box<Expr>) -> ModuleItem {
    ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
        span,
        decl: Decl::Var(Box::new(VarDecl {
            span: DUMMY_SP,
            ctxt: SyntaxContext::empty(),
            kind: VarDeclKind::Const,
            declare: false,
            decls: vec![VarDeclarator {
                span: DUMMY_SP,
                name: Pat::Ident(BindingIdent {
                    id: ident(name),
                    type_ann: None,
                }),
                init: Some(value),
                definite: false,
            }],
        })),
    }))
}
