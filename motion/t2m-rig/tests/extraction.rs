//! Skeleton extraction over generated hierarchies

use glam::{Mat4, Quat, Vec3};
use proptest::prelude::*;
use t2m_rig::{Armature, ObjectId, SceneObject, SkeletonCache, SkeletonExtractor, t2m_to_blender};

const EPSILON: f32 = 1e-3;

fn rest_matrix() -> impl Strategy<Value = Mat4> {
    (
        -3.0f32..3.0,
        -3.0f32..3.0,
        -3.0f32..3.0,
        -5.0f32..5.0,
        -5.0f32..5.0,
        -5.0f32..5.0,
    )
        .prop_map(|(rx, ry, rz, tx, ty, tz)| {
            let rotation = Quat::from_euler(glam::EulerRot::XYZ, rx, ry, rz);
            Mat4::from_rotation_translation(rotation, Vec3::new(tx, ty, tz))
        })
}

fn chain(matrices: &[Mat4]) -> Armature {
    let mut builder = Armature::builder("Chain").root("Bone0", matrices[0]);
    for (i, m) in matrices.iter().enumerate().skip(1) {
        builder = builder.child(format!("Bone{i}"), format!("Bone{}", i - 1), *m);
    }
    builder.build().unwrap()
}

proptest! {
    #[test]
    fn children_reconstruct_rest_pose(matrices in prop::collection::vec(rest_matrix(), 2..=4)) {
        let armature = chain(&matrices);
        let skeleton = SkeletonExtractor::new().extract_armature(&armature).unwrap();

        for i in 1..matrices.len() {
            let bone = skeleton.find(&format!("Bone{i}")).unwrap();
            let expected = matrices[i - 1].inverse() * matrices[i];
            prop_assert!(bone.transform().abs_diff_eq(expected, EPSILON));
            prop_assert!((matrices[i - 1] * bone.transform()).abs_diff_eq(matrices[i], EPSILON));
        }
    }

    #[test]
    fn root_survives_inverse_conversion(matrix in rest_matrix()) {
        let armature = chain(&[matrix, Mat4::IDENTITY]);
        let skeleton = SkeletonExtractor::new().extract_armature(&armature).unwrap();
        prop_assert!((t2m_to_blender() * skeleton.root.transform()).abs_diff_eq(matrix, EPSILON));
    }
}

#[test]
fn rig_file_extraction() {
    let armature = Armature::load(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/mixamo_rig.json")).unwrap();
    let object = SceneObject::with_armature(ObjectId(11), armature);
    let mut cache = SkeletonCache::new();
    let extractor = SkeletonExtractor::new();

    let skeleton = cache.get_or_compute(&object, &extractor).unwrap();

    assert_eq!(skeleton.root.name, "mixamorigHips");
    assert_eq!(skeleton.bone_count(), 4);
    assert!(skeleton.find("mixamorigLeftUpLeg").is_some());
    assert!(skeleton.find("mixamorig:Spine").is_none());

    let again = cache.get_or_compute(&object, &extractor).unwrap();
    assert!(std::sync::Arc::ptr_eq(&skeleton, &again));
}
