// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use std::sync::{Arc, OnceLock};

use libfuzzer_sys::fuzz_target;
use rdwire::{
    write_polymorphic_list, InternRoot, ReadBuffer, SerializationCtx, TypeRegistry, WireConfig,
    WriteBuffer,
};
use rdwire_demo::{v1_registry, Base, PROTOCOL_INTERN_KEY};

fn registry() -> &'static TypeRegistry<Base> {
    static REGISTRY: OnceLock<TypeRegistry<Base>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let config = WireConfig::default().max_payload_len(1 << 16);
        v1_registry(config).expect("demo registry")
    })
}

fn ctx() -> SerializationCtx {
    SerializationCtx::new().with_intern_root(PROTOCOL_INTERN_KEY, Arc::new(InternRoot::new()))
}

fuzz_target!(|data: &[u8]| {
    let mut reader = ReadBuffer::new(data);
    let Ok(values) = registry().read_polymorphic_list(&ctx(), &mut reader) else {
        return;
    };

    // Whatever decoded must encode again and decode to the same values.
    // Without a root, strings go inline and held definitions are all re-sent.
    let mut out = WriteBuffer::new();
    write_polymorphic_list(&SerializationCtx::new(), &mut out, &values).expect("re-encode");
    let mut reader = ReadBuffer::new(out.as_bytes());
    let again = registry()
        .read_polymorphic_list(&ctx(), &mut reader)
        .expect("decode re-encoded");
    assert_eq!(values, again);
});
