//! WGSL sources, assembled per layer.
//!
//! `noise.wgsl` is prepended to the shaders that sample noise so the GPU and
//! CPU versions share one definition.

pub const SKY: &str = include_str!("../shaders/sky.wgsl");

pub const STARS: &str = include_str!("../shaders/stars.wgsl");

pub const TERRAIN: &str = include_str!("../shaders/terrain.wgsl");

pub const OCEAN: &str = concat!(
    include_str!("../shaders/noise.wgsl"),
    include_str!("../shaders/ocean.wgsl")
);

pub const CLOUDS: &str = concat!(
    include_str!("../shaders/noise.wgsl"),
    include_str!("../shaders/clouds.wgsl")
);

#[cfg(test)]
mod tests {
    use super::*;

    fn compile_and_validate(name: &str, source: &str) -> Result<naga::Module, String> {
        let module = naga::front::wgsl::parse_str(source)
            .map_err(|e| format!("WGSL parse error in {}: {}", name, e.emit_to_string(source)))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("Validation error in {}: {:?}", name, e))?;

        Ok(module)
    }

    #[test]
    fn test_all_layer_shaders_validate() {
        let shaders = [
            ("sky", SKY),
            ("stars", STARS),
            ("terrain", TERRAIN),
            ("ocean", OCEAN),
            ("clouds", CLOUDS),
        ];

        let errors: Vec<String> = shaders
            .iter()
            .filter_map(|(name, source)| compile_and_validate(name, source).err())
            .collect();

        assert!(errors.is_empty(), "{}", errors.join("\n"));
    }

    #[test]
    fn test_entry_points_present() {
        for (name, source) in [
            ("sky", SKY),
            ("stars", STARS),
            ("terrain", TERRAIN),
            ("ocean", OCEAN),
            ("clouds", CLOUDS),
        ] {
            let module = compile_and_validate(name, source).unwrap();
            let names: Vec<&str> = module.entry_points.iter().map(|ep| ep.name.as_str()).collect();
            assert!(names.contains(&"vs_main"), "{} missing vs_main", name);
            assert!(names.contains(&"fs_main"), "{} missing fs_main", name);
        }
    }

    #[test]
    fn test_uniform_sizes_match_rust_structs() {
        use crate::clouds::CloudUniforms;
        use crate::ocean::OceanUniforms;
        use crate::sky::{SkyUniforms, StarUniforms};
        use crate::terrain::TerrainUniforms;

        let cases = [
            ("sky", SKY, "SkyUniforms", std::mem::size_of::<SkyUniforms>()),
            ("stars", STARS, "StarUniforms", std::mem::size_of::<StarUniforms>()),
            ("terrain", TERRAIN, "TerrainUniforms", std::mem::size_of::<TerrainUniforms>()),
            ("ocean", OCEAN, "OceanUniforms", std::mem::size_of::<OceanUniforms>()),
            ("clouds", CLOUDS, "CloudUniforms", std::mem::size_of::<CloudUniforms>()),
        ];

        for (name, source, struct_name, rust_size) in cases {
            let module = compile_and_validate(name, source).unwrap();
            let (_, ty) = module
                .types
                .iter()
                .find(|(_, ty)| ty.name.as_deref() == Some(struct_name))
                .unwrap_or_else(|| panic!("{} not declared in {}", struct_name, name));
            let wgsl_size = ty.inner.size(module.to_ctx()) as usize;
            assert_eq!(wgsl_size, rust_size, "{} layout mismatch", struct_name);
        }
    }

    #[test]
    fn test_noise_table_binding_matches_cpu_length() {
        let module = compile_and_validate("ocean", OCEAN).unwrap();
        let perm = module
            .global_variables
            .iter()
            .find(|(_, var)| var.name.as_deref() == Some("perm"))
            .map(|(_, var)| var)
            .unwrap();
        let size = module.types[perm.ty].inner.size(module.to_ctx()) as usize;
        assert_eq!(size, crate::noise::PERM_LEN * std::mem::size_of::<u32>());
    }
}
