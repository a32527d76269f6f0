//! Payload import through the in-memory recorder

use glam::{Mat4, Vec3};
use pretty_assertions::assert_eq;
use t2m_rig::{
    AnimationImporter, AnimationPayload, Armature, ImportOptions, Keyframe, ObjectId,
    PoseRecorder, SaveFile, SceneObject, read_animation,
};

const TWO_BONE_PAYLOAD: &str = r#"{
    "duration": 2.5,
    "bones": {
        "mixamorigHips": {
            "rotation": {"0.0": [0, 0, 0, 1]},
            "position": {"0.0": [1, 2, 3]}
        },
        "mixamorigSpine": {
            "rotation": {"0.0": [0, 0, 0, 1]}
        }
    }
}"#;

fn two_bone_object() -> SceneObject {
    let armature = Armature::builder("Armature")
        .root("mixamorig:Hips", Mat4::from_translation(Vec3::new(0.0, 0.0, 1.0)))
        .child(
            "mixamorig:Spine",
            "mixamorig:Hips",
            Mat4::from_translation(Vec3::new(0.0, 0.0, 1.2)),
        )
        .build()
        .unwrap();
    SceneObject::with_armature(ObjectId(1), armature)
}

#[test]
fn two_bone_end_to_end() {
    let object = two_bone_object();
    let payload = AnimationPayload::from_json(TWO_BONE_PAYLOAD).unwrap();
    let mut recorder = PoseRecorder::new(&object, 24.0).unwrap();

    let report = AnimationImporter::default()
        .import(&payload, &mut recorder)
        .unwrap();

    assert_eq!((report.frame_start, report.frame_end), (0, 60));
    assert_eq!(report.rotation_keys, 2);
    assert_eq!(report.location_keys, 1);
    assert!(report.skipped_unknown.is_empty());

    let action = recorder.into_action().unwrap();
    assert_eq!(action.name, "T2MGeneratedAction");
    assert_eq!(action.frame_end, 60);

    let hips = action.channel("mixamorig:Hips").unwrap();
    assert_eq!(
        hips.location,
        vec![Keyframe {
            frame: 0.0,
            value: [1.0, 2.0, 3.0]
        }]
    );
    assert_eq!(hips.rotation.len(), 1);
    assert_eq!(hips.rotation[0].frame, 0.0);
    assert_quat_identity(hips.rotation[0].value);

    let spine = action.channel("mixamorig:Spine").unwrap();
    assert!(spine.location.is_empty());
    assert_eq!(spine.rotation[0].frame, 0.0);
    assert_quat_identity(spine.rotation[0].value);
}

#[test]
fn root_motion_can_be_disabled() {
    let object = two_bone_object();
    let payload = AnimationPayload::from_json(TWO_BONE_PAYLOAD).unwrap();
    let mut recorder = PoseRecorder::new(&object, 24.0).unwrap();

    let importer = AnimationImporter::new(ImportOptions {
        action_name: "NoRootMotion".to_string(),
        apply_root_motion: false,
    });
    let report = importer.import(&payload, &mut recorder).unwrap();

    assert_eq!(report.skipped_root_motion, vec!["mixamorig:Hips".to_string()]);
    let action = recorder.into_action().unwrap();
    assert_eq!(action.name, "NoRootMotion");
    assert!(action.channel("mixamorig:Hips").is_none());
    assert!(action.channel("mixamorig:Spine").is_some());
}

#[test]
fn save_file_import_matches_bare_payload() {
    let object = two_bone_object();
    let payload = AnimationPayload::from_json(TWO_BONE_PAYLOAD).unwrap();
    let saved = SaveFile::new(&payload).unwrap().to_json_pretty().unwrap();

    let mut direct = PoseRecorder::new(&object, 30.0).unwrap();
    AnimationImporter::default().import(&payload, &mut direct).unwrap();

    let mut restored = PoseRecorder::new(&object, 30.0).unwrap();
    AnimationImporter::default()
        .import(&read_animation(&saved).unwrap(), &mut restored)
        .unwrap();

    assert_eq!(direct.into_action(), restored.into_action());
}

fn assert_quat_identity(wxyz: [f32; 4]) {
    let [w, x, y, z] = wxyz;
    assert!((w.abs() - 1.0).abs() < 1e-5, "w = {w}");
    assert!(x.abs() < 1e-5 && y.abs() < 1e-5 && z.abs() < 1e-5);
}
