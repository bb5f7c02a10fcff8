//! Bulk methods rendered as a loop over their singular counterpart.

use multidb_core::{capitalize, singularize};
use multidb_model::{Category, Field, MethodSignature, Param, element_type};

use super::EngineEmitter;
use crate::builder::CodeBuilder;
use crate::convert::convert;
use crate::synthesize::collection_field;

/// Where each collection element goes in the singular call.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    /// A field of the bundle passed at this parameter position.
    BundleField { param: usize, field: String },
    /// The parameter at this position.
    Param(usize),
}

/// Everything needed to render a bulk loop.
pub(super) struct BulkPlan<'m> {
    /// The singular method called per element.
    pub singular: &'m MethodSignature,
    /// Canonical parameter holding the collection.
    pub bundle: &'m Param,
    /// The collection field iterated over.
    pub field: &'m Field,
    slot: Slot,
    /// Elements are domain values: call the wrapper's own singular method,
    /// which already converts them for the engine.
    via_wrapper: bool,
}

impl EngineEmitter<'_> {
    /// Plan a bulk loop for `method`, if it is an error-only bulk method
    /// whose singular counterpart the engine provides.
    pub(super) fn bulk_plan<'m>(&'m self, method: &'m MethodSignature) -> Option<BulkPlan<'m>> {
        let name = method.bulk_for.as_deref()?;
        if !method.returns_only_error() {
            return None;
        }
        let engine_singular = self.target.method(name)?;
        let (bundle, field) = method.params.iter().find_map(|p| {
            let record = self.canonical.record(&p.ty)?;
            collection_field(record).map(|f| (p, f))
        })?;

        let element = element_type(&field.ty);
        if self.vocab.classify(element) == Category::Domain {
            let singular = self.canonical.method(name)?;
            let position = singular.params.iter().position(|p| p.ty == element)?;
            return Some(BulkPlan {
                singular,
                bundle,
                field,
                slot: Slot::Param(position),
                via_wrapper: true,
            });
        }

        let slot = self.element_slot(engine_singular, field)?;
        Some(BulkPlan {
            singular: engine_singular,
            bundle,
            field,
            slot,
            via_wrapper: false,
        })
    }

    /// Find the singular call's slot for one element: a field or parameter
    /// named like the singular of the collection, else the first one of the
    /// element type.
    fn element_slot(&self, singular: &MethodSignature, field: &Field) -> Option<Slot> {
        let wanted = singularize(&field.name);
        let element = element_type(&field.ty);

        let find = |matches: &dyn Fn(&str, &str) -> bool| {
            singular.params.iter().enumerate().find_map(|(i, p)| {
                if p.ty == "context.Context" {
                    return None;
                }
                match self.target.record(&p.ty) {
                    Some(bundle) => bundle
                        .fields
                        .iter()
                        .find(|f| matches(&f.name, &f.ty))
                        .map(|f| Slot::BundleField {
                            param: i,
                            field: f.name.clone(),
                        }),
                    None => matches(&capitalize(&p.name), &p.ty).then_some(Slot::Param(i)),
                }
            })
        };

        find(&|name: &str, _: &str| name == wanted)
            .or_else(|| find(&|_: &str, ty: &str| ty == element))
    }

    /// ```text
    /// for i, v := range arg.Usernames {
    ///     if err := w.adapter.CreateUser(ctx, pkg.CreateUserParams{Username: v}); err != nil {
    ///         return fmt.Errorf("CreateUsers: item %d: %w", i, err)
    ///     }
    /// }
    /// return nil
    /// ```
    pub(super) fn emit_bulk(&self, method: &MethodSignature, plan: &BulkPlan<'_>) -> String {
        let args = self.bulk_args(method, plan);
        let receiver = if plan.via_wrapper { "w" } else { "w.adapter" };
        let call = format!("{}.{}({})", receiver, plan.singular.name, args.join(", "));
        let checks_err = plan.singular.returns_error();
        let header = format!(
            "for {}, v := range {}.{} {{",
            if checks_err { "i" } else { "_" },
            plan.bundle.name,
            plan.field.name
        );
        let wrapped = format!(
            "fmt.Errorf(\"{}: item %d: %w\", i, err)",
            method.name
        );

        CodeBuilder::go()
            .block(&header, "}", |b| match Self::bind_err(plan.singular) {
                Some(lhs) if checks_err => b
                    .lines(&format!("if {} := {}; err != nil {{", lhs, call))
                    .indent()
                    .line(&self.returns_with(method, "", &wrapped))
                    .dedent()
                    .line("}"),
                _ => b.lines(&call),
            })
            .line(&self.returns_with(method, "", "nil"))
            .build()
    }

    fn bind_err(target: &MethodSignature) -> Option<String> {
        let names: Vec<&str> = target
            .returns
            .iter()
            .map(|r| if r.is_error { "err" } else { "_" })
            .collect();
        names.contains(&"err").then(|| names.join(", "))
    }

    fn bulk_args(&self, method: &MethodSignature, plan: &BulkPlan<'_>) -> Vec<String> {
        let source = self.canonical.record(&plan.bundle.ty);
        let element = element_type(&plan.field.ty);
        let qualify = |ty: &str| {
            if plan.via_wrapper {
                ty.to_string()
            } else {
                self.qualify(ty)
            }
        };
        let from_bundle = |name: &str, target_ty: &str| {
            let field = source?.field(name)?;
            Some(convert(
                self.vocab,
                name,
                &qualify(target_ty),
                &field.ty,
                &format!("{}.{}", plan.bundle.name, field.name),
            ))
        };

        plan.singular
            .params
            .iter()
            .enumerate()
            .map(|(i, param)| {
                if param.ty == "context.Context" {
                    return self.ctx_name(method).to_string();
                }
                if plan.slot == Slot::Param(i) {
                    return convert(self.vocab, &param.name, &qualify(&param.ty), element, "v")
                        .expr;
                }
                if let Some(bundle) = self.target.record(&param.ty).filter(|_| !plan.via_wrapper) {
                    let fields: Vec<_> = bundle
                        .fields
                        .iter()
                        .filter_map(|f| {
                            let is_slot = plan.slot
                                == Slot::BundleField {
                                    param: i,
                                    field: f.name.clone(),
                                };
                            if is_slot {
                                Some(convert(self.vocab, &f.name, &self.qualify(&f.ty), element, "v"))
                            } else {
                                from_bundle(&f.name, &f.ty)
                            }
                        })
                        .collect();
                    return self.bundle_literal(bundle, &fields);
                }
                if let Some(c) = from_bundle(&capitalize(&param.name), &param.ty) {
                    return c.expr;
                }
                match method.param(&param.name) {
                    Some(p) => convert(self.vocab, &param.name, &param.ty, &p.ty, &p.name).expr,
                    None => self.zero_value(&param.ty),
                }
            })
            .collect()
    }
}
