use swc_core::ecma::ast::*;
use tracing::debug;

use crate::config::Config;

/// The module's default export slot, as found by [`TransformState::locate`].
///
/// `item` is the statement's index in `Module::body`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultExport {
    Absent,
    /// `export default { ... }`, possibly behind parens or TS type wrappers.
    Object { item: usize },
    NonObject { item: usize, form: NonObjectForm },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonObjectForm {
    /// `export default <expr>`
    Expr,
    /// `export default function / class`
    Decl,
    /// `export { x as default }`, `specifier` indexes the specifier list.
    Specifier { specifier: usize },
}

/// Per-module pass state. Built by the locator, consumed by `finalize`.
#[derive(Debug)]
pub struct TransformState<'a> {
    config: &'a Config,
    filename: Option<&'a str>,
    pub(crate) default_export: DefaultExport,
    pub(crate) rename_target: Option<usize>,
}

impl<'a> TransformState<'a> {
    /// Scans the top-level statements once.
    pub fn locate(module: &Module, config: &'a Config, filename: Option<&'a str>) -> Self {
        let target = config.rename_default_exports_to.as_deref();
        let mut state = Self {
            config,
            filename,
            default_export: DefaultExport::Absent,
            rename_target: None,
        };

        for (item, stmt) in module.body.iter().enumerate() {
            if let ModuleItem::ModuleDecl(decl) = stmt {
                if let Some(found) = classify_default_export(item, decl) {
                    state.default_export = found;
                }
            }
            if let Some(target) = target {
                if binds_top_level_name(stmt, target) {
                    state.rename_target = Some(item);
                }
            }
        }

        debug!(
            filename = filename.unwrap_or("unknown"),
            default_export = ?state.default_export,
            rename_target = ?state.rename_target,
            "located exports"
        );
        state
    }

    pub fn config(&self) -> &'a Config {
        self.config
    }

    pub fn filename(&self) -> Option<&'a str> {
        self.filename
    }

    pub fn default_export(&self) -> DefaultExport {
        self.default_export
    }

    /// Index of the top-level statement that already binds the rename target.
    pub fn rename_target(&self) -> Option<usize> {
        self.rename_target
    }
}

fn classify_default_export(item: usize, decl: &ModuleDecl) -> Option<DefaultExport> {
    match decl {
        ModuleDecl::ExportDefaultExpr(e) => Some(if object_lit(&e.expr).is_some() {
            DefaultExport::Object { item }
        } else {
            DefaultExport::NonObject {
                item,
                form: NonObjectForm::Expr,
            }
        }),
        ModuleDecl::ExportDefaultDecl(d) => match d.decl {
            DefaultDecl::Fn(_) | DefaultDecl::Class(_) => Some(DefaultExport::NonObject {
                item,
                form: NonObjectForm::Decl,
            }),
            // type-only, erased at runtime
            DefaultDecl::TsInterfaceDecl(_) => None,
        },
        ModuleDecl::ExportNamed(named) if !named.type_only => named
            .specifiers
            .iter()
            .position(|s| match s {
                ExportSpecifier::Named(s) => !s.is_type_only && exported_name_is(s, "default"),
                _ => false,
            })
            .map(|specifier| DefaultExport::NonObject {
                item,
                form: NonObjectForm::Specifier { specifier },
            }),
        _ => None,
    }
}

/// Whether a top-level statement binds `name`, exported or not.
fn binds_top_level_name(stmt: &ModuleItem, name: &str) -> bool {
    match stmt {
        ModuleItem::Stmt(Stmt::Decl(decl)) => decl_binds(decl, name),
        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => decl_binds(&export.decl, name),
        ModuleItem::ModuleDecl(ModuleDecl::ExportNamed(named)) => {
            named.specifiers.iter().any(|s| match s {
                ExportSpecifier::Named(s) => exported_name_is(s, name),
                ExportSpecifier::Namespace(ns) => module_export_name_is(&ns.name, name),
                ExportSpecifier::Default(d) => d.exported.sym.as_ref() == name,
            })
        }
        ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
            import.specifiers.iter().any(|s| match s {
                ImportSpecifier::Named(s) => s.local.sym.as_ref() == name,
                ImportSpecifier::Default(s) => s.local.sym.as_ref() == name,
                ImportSpecifier::Namespace(s) => s.local.sym.as_ref() == name,
            })
        }
        _ => false,
    }
}

fn decl_binds(decl: &Decl, name: &str) -> bool {
    match decl {
        Decl::Var(var) => var
            .decls
            .iter()
            .any(|d| d.name.as_ident().is_some_and(|id| id.id.sym.as_ref() == name)),
        Decl::Fn(f) => f.ident.sym.as_ref() == name,
        Decl::Class(c) => c.ident.sym.as_ref() == name,
        _ => false,
    }
}

fn exported_name_is(spec: &ExportNamedSpecifier, name: &str) -> bool {
    module_export_name_is(spec.exported.as_ref().unwrap_or(&spec.orig), name)
}

fn module_export_name_is(export: &ModuleExportName, name: &str) -> bool {
    match export {
        ModuleExportName::Ident(i) => i.sym.as_ref() == name,
        ModuleExportName::Str(s) => s.value.as_ref() == name,
    }
}

/// Sees through `( ... )`, `as`, `satisfies`, `as const` and `<T>` to an object literal.
pub(crate) fn object_lit(expr: &Expr) -> Option<&ObjectLit> {
    match expr {
        Expr::Object(o) => Some(o),
        Expr::Paren(p) => object_lit(&p.expr),
        Expr::TsAs(e) => object_lit(&e.expr),
        Expr::TsSatisfies(e) => object_lit(&e.expr),
        Expr::TsConstAssertion(e) => object_lit(&e.expr),
        Expr::TsTypeAssertion(e) => object_lit(&e.expr),
        _ => None,
    }
}

pub(crate) fn object_lit_mut(expr: &mut Expr) -> Option<&mut ObjectLit> {
    match expr {
        Expr::Object(o) => Some(o),
        Expr::Paren(p) => object_lit_mut(&mut p.expr),
        Expr::TsAs(e) => object_lit_mut(&mut e.expr),
        Expr::TsSatisfies(e) => object_lit_mut(&mut e.expr),
        Expr::TsConstAssertion(e) => object_lit_mut(&mut e.expr),
        Expr::TsTypeAssertion(e) => object_lit_mut(&mut e.expr),
        _ => None,
    }
}
