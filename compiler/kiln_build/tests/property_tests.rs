//! Property-based tests for struct assembly.
//!
//! For random field lists with unique names these check:
//! 1. Order: the aggregate's fields match the declaration, name and type
//! 2. Determinism: a second session on the same table returns the same handle
//! 3. Layout: every offset is a multiple of its field's alignment

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::uninlined_format_args,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use kiln_build::{BuilderRegistry, TypeBuilder};
use kiln_ir::{IrContext, IrType, SharedTypeTable, TargetConfig};
use kiln_types::{FieldDescriptor, Scalar, SourceId, SourcePool};
use proptest::prelude::*;
use proptest::sample::select;

// -- Strategies --

fn scalar_strategy() -> impl Strategy<Value = Scalar> {
    select(Scalar::ALL.to_vec())
}

/// Unique field names paired with scalar types, in declaration order.
fn fields_strategy() -> impl Strategy<Value = Vec<(String, Scalar)>> {
    prop::collection::btree_map("[a-z][a-z0-9_]{0,8}", scalar_strategy(), 1..12)
        .prop_map(|fields| fields.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

fn declare(sources: &mut SourcePool, fields: &[(String, Scalar)]) -> SourceId {
    sources.composite(
        "Generated",
        fields
            .iter()
            .map(|(name, scalar)| FieldDescriptor::new(name.as_str(), scalar.id())),
    )
}

proptest! {
    #[test]
    fn fields_keep_declaration_order(fields in fields_strategy()) {
        let mut sources = SourcePool::new();
        let ty = declare(&mut sources, &fields);
        let ir = IrContext::new(TargetConfig::default());
        let registry = BuilderRegistry::new();
        let session = TypeBuilder::new(&sources, &ir, &registry);

        let built = session.build(ty).unwrap();
        let agg = ir.aggregate(built).unwrap().expect("an aggregate");
        prop_assert_eq!(agg.fields.len(), fields.len());
        for (field, (name, scalar)) in agg.fields.iter().zip(&fields) {
            prop_assert_eq!(&*field.name, name.as_str());
            prop_assert_eq!(field.ty, session.build(scalar.id()).unwrap());
        }
    }

    #[test]
    fn assembly_is_deterministic(fields in fields_strategy()) {
        let mut sources = SourcePool::new();
        let ty = declare(&mut sources, &fields);
        let registry = BuilderRegistry::new();
        let table = SharedTypeTable::new();

        let first_ir = IrContext::with_table(table.clone(), TargetConfig::default());
        let first = TypeBuilder::new(&sources, &first_ir, &registry).build(ty).unwrap();
        let len = table.len();

        let second_ir = IrContext::with_table(table.clone(), TargetConfig::default());
        let second = TypeBuilder::new(&sources, &second_ir, &registry).build(ty).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(table.len(), len);
    }

    #[test]
    fn offsets_respect_field_alignment(fields in fields_strategy()) {
        let mut sources = SourcePool::new();
        let ty = declare(&mut sources, &fields);
        let ir = IrContext::new(TargetConfig::default());
        let registry = BuilderRegistry::new();
        let session = TypeBuilder::new(&sources, &ir, &registry);

        let built = session.build(ty).unwrap();
        let layout = ir.layout_of(built).unwrap();
        let agg = ir.aggregate(built).unwrap().expect("an aggregate");
        let mut end = 0;
        for (field, &offset) in agg.fields.iter().zip(&layout.offsets) {
            let field_layout = ir.layout_of(field.ty).unwrap();
            prop_assert_eq!(offset % u64::from(field_layout.align), 0);
            prop_assert!(offset >= end);
            end = offset + field_layout.size;
        }
        prop_assert!(layout.size >= end);
        prop_assert_eq!(layout.size % u64::from(layout.align), 0);
    }
}

#[test]
fn scalars_are_primitive_handles() {
    let sources = SourcePool::new();
    let ir = IrContext::new(TargetConfig::default());
    let registry = BuilderRegistry::new();
    let session = TypeBuilder::new(&sources, &ir, &registry);

    for scalar in Scalar::ALL {
        let built: IrType = session.build(scalar.id()).unwrap();
        assert!(built.is_primitive());
        assert_eq!(ir.format_type(built), scalar.name());
    }
}
