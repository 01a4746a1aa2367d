// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Property-reference scan used to prune generated class views

use std::collections::BTreeSet;

use ecsql_ir::{
    ClassRef, Exp, FrameBound, FrameExtent, FrameStart, JoinKind, JoinSpec, SelectStatement,
    SingleSelect, WindowOver, WindowSpec,
};

/// Properties of one class alias referenced by a select
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyUsage {
    /// Every property is needed
    All,
    /// Only these root properties (lower-cased) are needed
    Only(BTreeSet<String>),
}

impl PropertyUsage {
    pub fn includes(&self, root_property: &str) -> bool {
        match self {
            PropertyUsage::All => true,
            PropertyUsage::Only(names) => names.contains(&root_property.to_ascii_lowercase()),
        }
    }
}

/// Root properties referenced through `alias` anywhere in `select`,
/// including correlated references from nested subqueries
pub fn collect_property_usage(select: &SingleSelect, alias: &str) -> PropertyUsage {
    let mut scan = UsageScan {
        alias,
        names: BTreeSet::new(),
        all: false,
    };
    scan.single_select(select);
    if scan.all {
        PropertyUsage::All
    } else {
        PropertyUsage::Only(scan.names)
    }
}

struct UsageScan<'s> {
    alias: &'s str,
    names: BTreeSet<String>,
    all: bool,
}

impl UsageScan<'_> {
    fn add(&mut self, class_alias: &str, access: &str) {
        if class_alias.eq_ignore_ascii_case(self.alias) {
            let root = access.split('.').next().unwrap_or(access);
            self.names.insert(root.to_ascii_lowercase());
        }
    }

    fn select(&mut self, select: &SelectStatement) {
        self.single_select(&select.first);
        for compound in &select.rest {
            self.single_select(&compound.select);
        }
    }

    fn single_select(&mut self, select: &SingleSelect) {
        for item in &select.select_list {
            self.exp(&item.exp);
        }
        for class_ref in &select.from {
            self.class_ref(class_ref);
        }
        self.opt(select.where_clause.as_ref());
        select.group_by.iter().for_each(|exp| self.exp(exp));
        self.opt(select.having.as_ref());
        for definition in &select.window_clause {
            self.window_spec(&definition.spec);
        }
        for order in &select.order_by {
            self.exp(&order.exp);
        }
        if let Some(limit) = &select.limit {
            self.exp(&limit.limit);
            self.opt(limit.offset.as_ref());
        }
    }

    fn class_ref(&mut self, class_ref: &ClassRef) {
        match class_ref {
            ClassRef::Join(join) => {
                self.class_ref(&join.lhs);
                self.class_ref(&join.rhs);
                if let JoinKind::Qualified {
                    spec: JoinSpec::On(on),
                    ..
                } = &join.kind
                {
                    self.exp(on);
                }
            }
            ClassRef::Subquery(subquery) => self.select(&subquery.select),
            ClassRef::TableValuedFunction(tvf) => {
                tvf.function.args.iter().for_each(|arg| self.exp(arg))
            }
            ClassRef::ClassName(_) | ClassRef::CommonTableBlock(_) => {}
        }
    }

    fn opt(&mut self, exp: Option<&Exp>) {
        if let Some(exp) = exp {
            self.exp(exp);
        }
    }

    fn exp(&mut self, exp: &Exp) {
        match exp {
            Exp::PropertyName(prop) => self.add(&prop.class_alias, &prop.access_string()),
            Exp::ExtractProperty(extract) => self.add(&extract.class_alias, &extract.access_string),
            Exp::ExtractInstance(extract) => {
                if extract.class_alias.eq_ignore_ascii_case(self.alias) {
                    self.all = true;
                }
            }
            Exp::Literal(_) | Exp::Parameter(_) | Exp::EnumValue(_) | Exp::TypeList(_) => {}
            Exp::Cast(cast) => self.exp(&cast.operand),
            Exp::BinaryValue(binary) => {
                self.exp(&binary.lhs);
                self.exp(&binary.rhs);
            }
            Exp::UnaryValue(unary) => self.exp(&unary.operand),
            Exp::FunctionCall(call) => call.args.iter().for_each(|arg| self.exp(arg)),
            Exp::Case(case) => {
                for branch in &case.whens {
                    self.exp(&branch.when);
                    self.exp(&branch.then);
                }
                self.opt(case.otherwise.as_deref());
            }
            Exp::Iif(iif) => {
                self.exp(&iif.condition);
                self.exp(&iif.then);
                self.exp(&iif.otherwise);
            }
            Exp::NavValueCreation(nav) => {
                self.add(&nav.property.class_alias, &nav.property.access_string());
                self.exp(&nav.id);
                self.opt(nav.rel_class_id.as_deref());
            }
            Exp::Subquery(select) => self.select(select),
            Exp::ValueList(values) => values.iter().for_each(|value| self.exp(value)),
            Exp::WindowFunction(window) => {
                window.function.args.iter().for_each(|arg| self.exp(arg));
                self.opt(window.filter.as_deref());
                if let WindowOver::Spec(spec) = &window.over {
                    self.window_spec(spec);
                }
            }
            Exp::BinaryBoolean(binary) => {
                self.exp(&binary.lhs);
                self.exp(&binary.rhs);
            }
            Exp::UnaryBoolean(unary) => self.exp(&unary.operand),
            Exp::Between(between) => {
                self.exp(&between.operand);
                self.exp(&between.lower);
                self.exp(&between.upper);
            }
            Exp::Like(like) => {
                self.exp(&like.operand);
                self.exp(&like.pattern);
                self.opt(like.escape.as_deref());
            }
            Exp::AllOrAny(quantified) => {
                self.exp(&quantified.operand);
                self.select(&quantified.subquery);
            }
            Exp::SubqueryTest(test) => self.select(&test.subquery),
        }
    }

    fn window_spec(&mut self, spec: &WindowSpec) {
        for column in &spec.partition_by {
            self.exp(&column.exp);
        }
        for order in &spec.order_by {
            self.exp(&order.exp);
        }
        let Some(frame) = &spec.frame else {
            return;
        };
        match &frame.extent {
            FrameExtent::Start(FrameStart::Preceding(value)) => self.exp(value),
            FrameExtent::Start(_) => {}
            FrameExtent::Between { first, second } => {
                self.frame_bound(first);
                self.frame_bound(second);
            }
        }
    }

    fn frame_bound(&mut self, bound: &FrameBound) {
        if let FrameBound::Preceding(value) | FrameBound::Following(value) = bound {
            self.exp(value);
        }
    }
}
