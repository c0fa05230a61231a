//! End-to-end type building: source pool, registry, session, IR context.
//!
//! Covers the scenarios a library author relies on:
//! 1. A two-pointer pair type lowered by a registered builder
//! 2. Deterministic, cache-independent results across sessions
//! 3. Declines that leave the IR universe untouched
//! 4. Layout hints that survive assembly
//! 5. Failures that propagate instead of producing partial types

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::sync::Arc;

use kiln_build::{
    assemble_struct, init_tracing, BuildContext, BuildError, BuilderRegistry, CompositeBuilder,
    CustomTypeBuilder, FieldListBuilder, StructPolicy, TypeBuilder, TypeKey,
};
use kiln_ir::{
    AddressSpace, Align, AlignmentKind, ConstructError, IrContext, IrType, LayoutHint,
    RefTypeHint, SharedTypeTable, TargetConfig,
};
use kiln_types::{FieldDescriptor, SourceId, SourcePool};
use pretty_assertions::assert_eq;
use rayon::prelude::*;

struct Fixture {
    sources: SourcePool,
    pair: SourceId,
    f32_ptr: SourceId,
}

impl Fixture {
    fn new() -> Self {
        init_tracing();
        let mut sources = SourcePool::new();
        let pair = sources.opaque("DevicePair");
        let f32_ptr = sources.device_ptr(SourceId::F32);
        Self {
            sources,
            pair,
            f32_ptr,
        }
    }

    fn registry(&self) -> BuilderRegistry {
        BuilderRegistry::from_table([(
            TypeKey::Exact(self.pair),
            Arc::new(FieldListBuilder::pair(self.pair, self.f32_ptr)) as Arc<dyn CustomTypeBuilder>,
        )])
        .expect("fresh registry")
    }
}

#[test]
fn device_pair_lowers_to_two_global_pointers() {
    let fx = Fixture::new();
    let registry = fx.registry();
    let ir = IrContext::new(TargetConfig::default());
    let session = TypeBuilder::new(&fx.sources, &ir, &registry);

    let built = session.build(fx.pair).unwrap();
    let agg = ir.aggregate(built).unwrap().expect("an aggregate");
    let elem = ir.pointer(IrType::F32, AddressSpace::Global).unwrap();

    let shape: Vec<(&str, IrType)> = agg.fields.iter().map(|f| (&*f.name, f.ty)).collect();
    assert_eq!(shape, vec![("First", elem), ("Second", elem)]);
    assert_eq!(agg.alignment, AlignmentKind::Natural);
    assert_eq!(agg.layout, LayoutHint::Sequential);
    assert_eq!(agg.ref_hint, RefTypeHint::Default);
    assert!(ir.passes_by_reference(built).unwrap());

    let layout = ir.layout_of(built).unwrap();
    assert_eq!((layout.size, layout.align), (16, 8));
}

#[test]
fn pair_layout_follows_pointer_width() {
    let mut fx = Fixture::new();
    let f64_ptr = fx.sources.device_ptr(SourceId::F64);
    let registry = fx.registry();
    let ir = IrContext::new(TargetConfig::device64_short_pointers());
    let session = TypeBuilder::new(&fx.sources, &ir, &registry);

    // Device pointers default to the global space, which stays 8 bytes wide.
    let built = session.build(fx.pair).unwrap();
    assert_eq!(ir.layout_of(built).unwrap().size, 16);
    let ptr = session.build(f64_ptr).unwrap();
    assert_eq!(ir.format_type(ptr), "f64 addrspace(global)*");
}

#[test]
fn nested_builds_match_standalone_builds() {
    let mut fx = Fixture::new();
    let holder = fx.sources.composite(
        "Holder",
        [
            FieldDescriptor::new("count", SourceId::U32),
            FieldDescriptor::new("pair", fx.pair),
        ],
    );
    let registry = fx.registry();
    let table = SharedTypeTable::new();

    let outer_ir = IrContext::with_table(table.clone(), TargetConfig::default());
    let outer = TypeBuilder::new(&fx.sources, &outer_ir, &registry);
    let built = outer.build(holder).unwrap();
    let nested = outer_ir.aggregate(built).unwrap().unwrap().fields[1].ty;

    let fresh_ir = IrContext::with_table(table, TargetConfig::default());
    let fresh = TypeBuilder::new(&fx.sources, &fresh_ir, &registry);
    assert_eq!(fresh.cached(fx.pair), None);
    assert_eq!(fresh.build(fx.pair).unwrap(), nested);
    assert_eq!(fresh.build(holder).unwrap(), built);
}

#[test]
fn building_twice_yields_the_same_type() {
    let fx = Fixture::new();
    let registry = fx.registry();
    let ir = IrContext::new(TargetConfig::default());

    let first = TypeBuilder::new(&fx.sources, &ir, &registry)
        .build(fx.pair)
        .unwrap();
    let len = ir.table().len();
    let second = TypeBuilder::new(&fx.sources, &ir, &registry)
        .build(fx.pair)
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(ir.table().len(), len);
}

#[test]
fn declining_leaves_the_table_untouched() {
    let mut fx = Fixture::new();
    let other = fx.sources.opaque("Other");
    let registry = fx.registry();
    let ir = IrContext::new(TargetConfig::default());
    let session = TypeBuilder::new(&fx.sources, &ir, &registry);
    let before = ir.table().len();

    let builder = FieldListBuilder::pair(fx.pair, fx.f32_ptr);
    assert_eq!(session.invoke(&builder, other).unwrap(), None);
    assert_eq!(ir.table().len(), before);
}

#[test]
fn explicit_alignment_is_reported() {
    let mut fx = Fixture::new();
    let block = fx.sources.composite_in_family(
        "Aligned",
        "Aligned<f32>",
        [FieldDescriptor::new("value", SourceId::F32)],
    );
    let policy = StructPolicy::default()
        .with_alignment(AlignmentKind::Explicit(Align::new(32).unwrap()));
    let registry = BuilderRegistry::from_table([(
        TypeKey::family("Aligned"),
        Arc::new(CompositeBuilder::new(TypeKey::family("Aligned")).with_policy(policy))
            as Arc<dyn CustomTypeBuilder>,
    )])
    .unwrap();
    let ir = IrContext::new(TargetConfig::default());
    let session = TypeBuilder::new(&fx.sources, &ir, &registry);

    let built = session.build(block).unwrap();
    let layout = ir.layout_of(built).unwrap();
    assert_eq!((layout.size, layout.align), (32, 32));
    assert_eq!(ir.format_type(built), "struct align(32) { value: f32 }");
}

#[test]
fn oversized_alignment_is_rejected() {
    let fx = Fixture::new();
    let too_big = StructPolicy::default()
        .with_alignment(AlignmentKind::Explicit(Align::new(512).unwrap()));
    let registry = BuilderRegistry::new();
    let ir = IrContext::new(TargetConfig::default());
    let session = TypeBuilder::new(&fx.sources, &ir, &registry);

    let builder = FieldListBuilder::pair(fx.pair, fx.f32_ptr).with_policy(too_big);
    let err = session.invoke(&builder, fx.pair).unwrap_err();
    assert_eq!(
        err,
        BuildError::Construction {
            ty: "DevicePair".into(),
            source: ConstructError::AlignmentTooLarge {
                requested: 512,
                max: 256
            },
        }
    );
}

#[test]
fn unresolvable_field_fails_the_enclosing_build() {
    let mut fx = Fixture::new();
    let handle = fx.sources.opaque("FileHandle");
    let inner = fx.sources.composite(
        "Inner",
        [
            FieldDescriptor::new("ok", SourceId::I32),
            FieldDescriptor::new("handle", handle),
        ],
    );
    let outer = fx
        .sources
        .composite("Outer", [FieldDescriptor::new("inner", inner)]);
    let registry = fx.registry();
    let ir = IrContext::new(TargetConfig::default());
    let session = TypeBuilder::new(&fx.sources, &ir, &registry);
    let before = ir.table().len();

    let err = session.build(outer).unwrap_err();
    assert_eq!(err.field_path(), vec!["inner", "handle"]);
    assert_eq!(
        err.root_cause(),
        &BuildError::Unsupported {
            ty: "FileHandle".into()
        }
    );
    assert_eq!(
        err.to_string(),
        "cannot build field `inner` of `Outer`"
    );
    assert_eq!(ir.table().len(), before);
    assert_eq!(session.cached(inner), None);
}

#[test]
fn recursive_composite_is_rejected() {
    let mut fx = Fixture::new();
    let node = fx.sources.declare_composite("Node");
    let next = fx.sources.device_ptr(node);
    assert!(fx
        .sources
        .define_fields(node, [FieldDescriptor::new("next", next)]));
    let registry = fx.registry();
    let ir = IrContext::new(TargetConfig::default());
    let session = TypeBuilder::new(&fx.sources, &ir, &registry);

    let err = session.build(node).unwrap_err();
    assert_eq!(
        err.root_cause(),
        &BuildError::RecursiveType { ty: "Node".into() }
    );
}

#[test]
fn closures_can_assemble_custom_layouts() {
    let mut fx = Fixture::new();
    let color = fx.sources.opaque("Color");
    let rgba = |cx: &dyn BuildContext, ty: SourceId| -> Result<Option<IrType>, BuildError> {
        let channels: Vec<FieldDescriptor> = ["r", "g", "b", "a"]
            .into_iter()
            .map(|name| FieldDescriptor::new(name, SourceId::U8))
            .collect();
        let policy = StructPolicy::default().with_ref_hint(RefTypeHint::ByValue);
        assemble_struct(cx, ty, &channels, &policy).map(Some)
    };
    let registry =
        BuilderRegistry::from_table([(TypeKey::Exact(color), Arc::new(rgba) as Arc<dyn CustomTypeBuilder>)])
            .unwrap();
    let ir = IrContext::new(TargetConfig::default());
    let session = TypeBuilder::new(&fx.sources, &ir, &registry);

    let built = session.build(color).unwrap();
    assert_eq!(
        ir.format_type(built),
        "struct byval { r: u8, g: u8, b: u8, a: u8 }"
    );
    assert!(!ir.passes_by_reference(built).unwrap());
    assert_eq!(ir.layout_of(built).unwrap().size, 4);
}

#[test]
fn parallel_sessions_agree_on_a_shared_table() {
    let mut fx = Fixture::new();
    let holders: Vec<SourceId> = (0..16)
        .map(|i| {
            let arr = fx.sources.array(SourceId::F32, i + 1);
            fx.sources.composite(
                format!("Holder{i}"),
                [
                    FieldDescriptor::new("pair", fx.pair),
                    FieldDescriptor::new("data", arr),
                ],
            )
        })
        .collect();
    let registry = fx.registry();
    let table = SharedTypeTable::new();

    let results: Vec<Vec<IrType>> = (0..8)
        .into_par_iter()
        .map(|_| {
            let ir = IrContext::with_table(table.clone(), TargetConfig::default());
            let session = TypeBuilder::new(&fx.sources, &ir, &registry);
            holders
                .iter()
                .map(|&holder| session.build(holder).unwrap())
                .collect()
        })
        .collect();

    for other in &results[1..] {
        assert_eq!(other, &results[0]);
    }
}
