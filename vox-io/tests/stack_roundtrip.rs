//! Full pipeline: STL bytes on disk in, a stack of BMP files out.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::Write;
use std::path::Path;

use vox_io::{load_stl, BmpStackWriter};
use vox_slice::{plan, voxelize_into, voxelize_into_parallel, FacetBvh, PlanParams};
use vox_types::cube;

/// Serialize a mesh as binary STL.
fn write_binary_stl(path: &Path, mesh: &vox_types::TriMesh) {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&[b' '; 80]);
    u32::try_from(mesh.facet_count())
        .map(|n| bytes.extend_from_slice(&n.to_le_bytes()))
        .unwrap();
    for facet in mesh.iter() {
        for c in [facet.normal.x, facet.normal.y, facet.normal.z] {
            bytes.extend_from_slice(&(c as f32).to_le_bytes());
        }
        for v in facet.vertices() {
            for c in [v.x, v.y, v.z] {
                bytes.extend_from_slice(&(c as f32).to_le_bytes());
            }
        }
        bytes.extend_from_slice(&0u16.to_le_bytes());
    }
    let mut file = std::fs::File::create(path).unwrap();
    file.write_all(&bytes).unwrap();
}

#[test]
fn cube_stl_to_bmp_stack() {
    let dir = tempfile::tempdir().unwrap();
    let stl_path = dir.path().join("cube.stl");
    write_binary_stl(&stl_path, &cube(10.0));

    let mesh = load_stl(&stl_path).unwrap();
    assert_eq!(mesh.facet_count(), 12);

    let plan = plan(mesh, &PlanParams::new(1.0)).unwrap();
    let bvh = FacetBvh::build(&plan.mesh);

    let out_dir = dir.path().join("slices");
    let mut sink = BmpStackWriter::create(&out_dir, &plan.grid).unwrap();
    voxelize_into(&bvh, &plan.grid, &mut sink).unwrap();

    // Ten files, indices zero-padded, lowest index at the bottom layer
    let mut names: Vec<String> = std::fs::read_dir(&out_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    let expected: Vec<String> = (0..10).map(|i| format!("image{i:05}.bmp")).collect();
    assert_eq!(names, expected);

    // Every file is a fully solid 10x10 monochrome bitmap
    for name in &names {
        let bytes = std::fs::read(out_dir.join(name)).unwrap();
        assert_eq!(bytes.len(), 62 + 10 * 4, "{name}");
        assert_eq!(&bytes[0..2], b"BM");
        assert_eq!(u32::from_le_bytes(bytes[10..14].try_into().unwrap()), 62);
        assert_eq!(i32::from_le_bytes(bytes[4 + 14..8 + 14].try_into().unwrap()), 10);
        assert_eq!(u16::from_le_bytes(bytes[14 + 14..16 + 14].try_into().unwrap()), 1);
        // ppm for 1 mm pitch
        assert_eq!(
            i32::from_le_bytes(bytes[24 + 14..28 + 14].try_into().unwrap()),
            1000
        );
        for row in 0..10 {
            let start = 62 + row * 4;
            assert_eq!(&bytes[start..start + 4], &[0xFF, 0xC0, 0x00, 0x00], "{name}");
        }
    }
}

#[test]
fn parallel_run_produces_identical_files() {
    let dir = tempfile::tempdir().unwrap();
    let stl_path = dir.path().join("cube.stl");
    write_binary_stl(&stl_path, &cube(6.0));

    let mesh = load_stl(&stl_path).unwrap();
    let plan = plan(mesh, &PlanParams::new(0.5)).unwrap();
    let bvh = FacetBvh::build(&plan.mesh);

    let seq_dir = dir.path().join("seq");
    let mut sink = BmpStackWriter::create(&seq_dir, &plan.grid).unwrap();
    voxelize_into(&bvh, &plan.grid, &mut sink).unwrap();

    let par_dir = dir.path().join("par");
    let mut sink = BmpStackWriter::create(&par_dir, &plan.grid).unwrap();
    voxelize_into_parallel(&bvh, &plan.grid, &mut sink).unwrap();

    for index in 0..plan.grid.nz {
        let name = format!("image{index:05}.bmp");
        let a = std::fs::read(seq_dir.join(&name)).unwrap();
        let b = std::fs::read(par_dir.join(&name)).unwrap();
        assert_eq!(a, b, "{name}");
    }
}
