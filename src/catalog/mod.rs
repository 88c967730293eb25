pub mod layers;

use crate::hub::{Framework, ModelHub, ModelRef};
use crate::Result;
use anyhow::bail;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Four-part key describing one catalogue entry. Serialized once into an
/// opaque string that doubles as the result table's row key, so it must be
/// unique across the full catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Identity {
    pub architecture: String,
    pub task: String,
    pub training: String,
    pub source: String,
}

impl Identity {
    pub fn new(architecture: &str, task: &str, training: &str, source: &str) -> Self {
        Self {
            architecture: architecture.to_string(),
            task: task.to_string(),
            training: training.to_string(),
            source: source.to_string(),
        }
    }

    pub fn id(&self) -> String {
        format!(
            "architecture:{}|task:{}|kind:{}|source:{}",
            self.architecture, self.task, self.training, self.source
        )
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Family {
    ResNet18,
    ResNet50,
    ResNet18Graph,
    AlexNet,
    Vgg16,
    SqueezeNet,
}

impl Family {
    pub const ALL: [Family; 6] = [
        Family::ResNet18,
        Family::ResNet50,
        Family::ResNet18Graph,
        Family::AlexNet,
        Family::Vgg16,
        Family::SqueezeNet,
    ];
}

/// Input resolution and channel normalization handed to the extraction
/// engine alongside the model.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Preprocess {
    pub resolution: u32,
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl Default for Preprocess {
    fn default() -> Self {
        Self {
            resolution: 224,
            mean: [0.485, 0.456, 0.406],
            std: [0.229, 0.224, 0.225],
        }
    }
}

impl Preprocess {
    pub fn with_resolution(resolution: u32) -> Self {
        Self {
            resolution,
            ..Self::default()
        }
    }
}

/// What the model hub must construct for one entry. Weight download and
/// checkpoint deserialization happen on the other side of the seam.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelRequest {
    Torchvision { arch: TorchvisionArch, pretrained: bool },
    TorchHub { repo: String, name: String },
    Vvs { name: String },
    Taskonomy { task: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TorchvisionArch {
    Resnet18,
    Resnet50,
    Alexnet,
    Vgg16,
    Squeezenet1_0,
}

impl TorchvisionArch {
    fn descriptor(self) -> (&'static str, Family) {
        match self {
            TorchvisionArch::Resnet18 => ("ResNet18", Family::ResNet18),
            TorchvisionArch::Resnet50 => ("ResNet50", Family::ResNet50),
            TorchvisionArch::Alexnet => ("AlexNet", Family::AlexNet),
            TorchvisionArch::Vgg16 => ("VGG16", Family::Vgg16),
            TorchvisionArch::Squeezenet1_0 => ("SqueezeNet", Family::SqueezeNet),
        }
    }
}

/// How an entry's Layer Set is picked. The VVS collection reuses ResNet18
/// but some of its checkpoints are graph-toolkit ports, so the choice is
/// deferred until the built model reports its framework.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerRule {
    Fixed(Family),
    VvsResNet18,
}

impl LayerRule {
    pub fn resolve(self, framework: Framework) -> &'static [String] {
        match self {
            LayerRule::Fixed(family) => layers::for_family(family),
            LayerRule::VvsResNet18 => match framework {
                Framework::Pytorch => layers::for_family(Family::ResNet18),
                Framework::Tensorflow => layers::for_family(Family::ResNet18Graph),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub identity: Identity,
    pub request: ModelRequest,
    pub preprocess: Preprocess,
    pub layers: LayerRule,
}

/// Category switches. Selecting `additional` yields only the fixed
/// alternate set and overrides every other switch.
#[derive(Debug, Clone, Copy)]
pub struct Selection {
    pub pytorch: bool,
    pub vvs: bool,
    pub taskonomy: bool,
    pub torch_hub: bool,
    pub additional: bool,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            pytorch: true,
            vvs: true,
            taskonomy: true,
            torch_hub: true,
            additional: false,
        }
    }
}

impl Selection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn additional_only() -> Self {
        Self {
            pytorch: false,
            vvs: false,
            taskonomy: false,
            torch_hub: false,
            additional: true,
        }
    }

    pub fn from_flag(additional: bool) -> Self {
        if additional {
            Self::additional_only()
        } else {
            Self::all()
        }
    }
}

/// One instantiated model paired with its identity, preprocessing and the
/// Layer Set to probe. Built on demand during traversal and consumed
/// immediately by the driver.
#[derive(Debug)]
pub struct ActivationModel {
    pub identity: Identity,
    pub model: ModelRef,
    pub preprocess: Preprocess,
    pub layers: &'static [String],
}

pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Assembles the entry list for a selection. Pure metadata; no model is
    /// constructed here. Fails on duplicate identities or a bad layer table.
    pub fn select(selection: Selection) -> Result<Self> {
        layers::verify()?;

        let mut entries = Vec::new();
        if selection.additional {
            entries.extend(additional_entries());
        } else {
            if selection.pytorch {
                entries.extend(pytorch_entries());
            }
            if selection.vvs {
                entries.extend(vvs_entries());
            }
            if selection.taskonomy {
                entries.extend(taskonomy_entries());
            }
            if selection.torch_hub {
                entries.extend(torch_hub_entries());
            }
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.identity.id()) {
                bail!("duplicate model identity in catalogue: {}", entry.identity);
            }
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lazy traversal in catalogue order: each step asks the hub to build
    /// one model and resolves its Layer Set. Construction failures surface
    /// verbatim and end the traversal.
    pub fn models<'a>(
        &'a self,
        hub: &'a dyn ModelHub,
    ) -> impl Iterator<Item = Result<ActivationModel>> + 'a {
        self.entries.iter().map(move |entry| {
            let built = hub.build(&entry.request)?;
            Ok(ActivationModel {
                identity: entry.identity.clone(),
                model: built.model,
                preprocess: entry.preprocess,
                layers: entry.layers.resolve(built.framework),
            })
        })
    }
}

fn torchvision_entry(arch: TorchvisionArch, pretrained: bool) -> CatalogEntry {
    let (architecture, family) = arch.descriptor();
    let (task, training) = if pretrained {
        ("Object Classification", "Supervised")
    } else {
        ("None", "Untrained")
    };
    CatalogEntry {
        identity: Identity::new(architecture, task, training, "PyTorch"),
        request: ModelRequest::Torchvision { arch, pretrained },
        preprocess: Preprocess::default(),
        layers: LayerRule::Fixed(family),
    }
}

fn pytorch_entries() -> Vec<CatalogEntry> {
    vec![
        torchvision_entry(TorchvisionArch::Resnet18, false),
        torchvision_entry(TorchvisionArch::Resnet50, false),
        torchvision_entry(TorchvisionArch::Resnet18, true),
        torchvision_entry(TorchvisionArch::Resnet50, true),
    ]
}

const VVS_CONFIGS: [(&str, &str, &str); 11] = [
    ("resnet18-supervised", "Object Classification", "Supervised"),
    ("resnet18-la", "Local Aggregation", "Self-Supervised"),
    ("resnet18-ir", "Instance Recognition", "Self-Supervised"),
    ("resnet18-ae", "Auto-Encoder", "Self-Supervised"),
    ("resnet18-cpc", "Contrastive Predictive Coding", "Self-Supervised"),
    ("resnet18-color", "Colorization", "Self-Supervised"),
    ("resnet18-rp", "Relative Position", "Self-Supervised"),
    ("resnet18-depth", "Depth Prediction", "Supervised"),
    ("resnet18-simclr", "SimCLR", "Self-Supervised"),
    ("resnet18-deepcluster", "Deep Cluster", "Self-Supervised"),
    ("resnet18-cmc", "Contrastive Multiview Coding", "Self-Supervised"),
];

fn vvs_entries() -> Vec<CatalogEntry> {
    VVS_CONFIGS
        .iter()
        .map(|&(name, task, kind)| CatalogEntry {
            identity: Identity::new("ResNet18", task, kind, "VVS"),
            request: ModelRequest::Vvs {
                name: name.to_string(),
            },
            preprocess: Preprocess::default(),
            layers: LayerRule::VvsResNet18,
        })
        .collect()
}

const TASKONOMY_CONFIGS: [(&str, &str, &str); 24] = [
    ("autoencoding", "Auto-Encoder", "Self-Supervised"),
    ("curvature", "Curvature Estimation", "Supervised"),
    ("denoising", "Denoising", "Self-Supervised"),
    ("edge_texture", "Edge Detection (2D)", "Supervised"),
    ("edge_occlusion", "Edge Detection (3D)", "Supervised"),
    ("egomotion", "Egomotion", "Supervised"),
    ("fixated_pose", "Fixated Pose Estimation", "Supervised"),
    ("jigsaw", "Jigsaw", "Self-Supervised"),
    ("keypoints2d", "Keypoint Detection (2D)", "Supervised"),
    ("keypoints3d", "Keypoint Detection (3D)", "Supervised"),
    ("nonfixated_pose", "Non-Fixated Pose Estimation", "Supervised"),
    ("point_matching", "Point Matching", "Supervised"),
    ("reshading", "Reshading", "Supervised"),
    ("depth_zbuffer", "Depth Estimation (Z-Buffer)", "Supervised"),
    ("depth_euclidean", "Depth Estimation", "Supervised"),
    ("normal", "Surface Normals Estimation", "Supervised"),
    ("room_layout", "Room Layout", "Supervised"),
    ("segment_unsup25d", "Unsupervised Segmentation (25D)", "Self-Supervised"),
    ("segment_unsup2d", "Unsupervised Segmentation (2D)", "Self-Supervised"),
    ("segment_semantic", "Semantic Segmentation", "Supervised"),
    ("class_object", "Object Classification", "Supervised"),
    ("class_scene", "Scene Classification", "Supervised"),
    ("inpainting", "Inpainting", "Self-Supervised"),
    ("vanishing_point", "Vanishing Point Estimation", "Supervised"),
];

fn taskonomy_entries() -> Vec<CatalogEntry> {
    TASKONOMY_CONFIGS
        .iter()
        .map(|&(task_tag, task, kind)| CatalogEntry {
            identity: Identity::new("ResNet50", task, kind, "Taskonomy"),
            request: ModelRequest::Taskonomy {
                task: task_tag.to_string(),
            },
            // Taskonomy encoders were trained on 256x256 crops.
            preprocess: Preprocess::with_resolution(256),
            layers: LayerRule::Fixed(Family::ResNet50),
        })
        .collect()
}

fn torch_hub_entries() -> Vec<CatalogEntry> {
    vec![CatalogEntry {
        identity: Identity::new("ResNet50", "Barlow-Twins", "Self-Supervised", "Pytorch Hub"),
        request: ModelRequest::TorchHub {
            repo: "facebookresearch/barlowtwins:main".to_string(),
            name: "resnet50".to_string(),
        },
        preprocess: Preprocess::default(),
        layers: LayerRule::Fixed(Family::ResNet50),
    }]
}

fn additional_entries() -> Vec<CatalogEntry> {
    vec![
        torchvision_entry(TorchvisionArch::Alexnet, false),
        torchvision_entry(TorchvisionArch::Alexnet, true),
        torchvision_entry(TorchvisionArch::Vgg16, false),
        torchvision_entry(TorchvisionArch::Vgg16, true),
        torchvision_entry(TorchvisionArch::Squeezenet1_0, false),
        torchvision_entry(TorchvisionArch::Squeezenet1_0, true),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_key() {
        let identity = Identity::new("ResNet18", "None", "Untrained", "PyTorch");
        assert_eq!(
            identity.id(),
            "architecture:ResNet18|task:None|kind:Untrained|source:PyTorch"
        );
    }

    #[test]
    fn test_full_catalogue_identities_unique() {
        let catalog = Catalog::select(Selection::all()).unwrap();
        assert_eq!(catalog.len(), 40);

        let ids: HashSet<String> = catalog
            .entries()
            .iter()
            .map(|e| e.identity.id())
            .collect();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_additional_overrides_other_switches() {
        let selection = Selection {
            pytorch: true,
            vvs: true,
            taskonomy: true,
            torch_hub: true,
            additional: true,
        };
        let catalog = Catalog::select(selection).unwrap();
        assert_eq!(catalog.len(), 6);

        let architectures: Vec<&str> = catalog
            .entries()
            .iter()
            .map(|e| e.identity.architecture.as_str())
            .collect();
        assert_eq!(
            architectures,
            ["AlexNet", "AlexNet", "VGG16", "VGG16", "SqueezeNet", "SqueezeNet"]
        );
        assert!(catalog.entries().iter().all(|e| e.identity.source == "PyTorch"));
    }

    #[test]
    fn test_category_sizes() {
        assert_eq!(pytorch_entries().len(), 4);
        assert_eq!(vvs_entries().len(), 11);
        assert_eq!(taskonomy_entries().len(), 24);
        assert_eq!(torch_hub_entries().len(), 1);
    }

    #[test]
    fn test_taskonomy_resolution_override() {
        for entry in taskonomy_entries() {
            assert_eq!(entry.preprocess.resolution, 256);
        }
        for entry in pytorch_entries() {
            assert_eq!(entry.preprocess.resolution, 224);
        }
    }

    #[test]
    fn test_vvs_layer_rule_follows_framework() {
        let rule = LayerRule::VvsResNet18;
        assert_eq!(
            rule.resolve(Framework::Pytorch).first().unwrap(),
            "layer1.0.relu"
        );
        assert_eq!(
            rule.resolve(Framework::Tensorflow).first().unwrap(),
            "encode_2"
        );
    }
}
