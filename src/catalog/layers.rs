use super::Family;
use crate::Result;
use anyhow::bail;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Post-activation probe points for each architecture family. These lists are
/// hand-curated; the names must resolve against the built model's internal
/// structure, which only the extraction engine can check.
pub static RESNET18: Lazy<Vec<String>> = Lazy::new(|| stage_relu_layers(&[2, 2, 2, 2]));

pub static RESNET50: Lazy<Vec<String>> = Lazy::new(|| stage_relu_layers(&[3, 4, 6, 3]));

/// The graph-toolkit port of ResNet18 exposes its stages under different
/// names than the native variant.
pub static RESNET18_GRAPH: Lazy<Vec<String>> =
    Lazy::new(|| (2..10).map(|i| format!("encode_{}", i)).collect());

pub static ALEXNET: Lazy<Vec<String>> = Lazy::new(|| feature_layers(&[1, 4, 7, 9, 11]));

pub static VGG16: Lazy<Vec<String>> = Lazy::new(|| feature_layers(&[18, 20, 22, 25, 27, 29]));

pub static SQUEEZENET: Lazy<Vec<String>> = Lazy::new(|| feature_layers(&[4, 6, 8, 10, 12]));

fn stage_relu_layers(blocks_per_stage: &[usize]) -> Vec<String> {
    blocks_per_stage
        .iter()
        .enumerate()
        .flat_map(|(stage, &blocks)| {
            (0..blocks).map(move |block| format!("layer{}.{}.relu", stage + 1, block))
        })
        .collect()
}

fn feature_layers(indices: &[usize]) -> Vec<String> {
    indices.iter().map(|i| format!("features.{}", i)).collect()
}

pub fn for_family(family: Family) -> &'static [String] {
    match family {
        Family::ResNet18 => &RESNET18,
        Family::ResNet50 => &RESNET50,
        Family::ResNet18Graph => &RESNET18_GRAPH,
        Family::AlexNet => &ALEXNET,
        Family::Vgg16 => &VGG16,
        Family::SqueezeNet => &SQUEEZENET,
    }
}

/// Checks every family table for non-emptiness and duplicate names. Run once
/// per catalogue construction so a bad edit fails loudly instead of probing
/// the wrong activation points.
pub fn verify() -> Result<()> {
    for family in Family::ALL {
        let layers = for_family(family);
        if layers.is_empty() {
            bail!("empty layer table for {:?}", family);
        }
        let mut seen = HashSet::new();
        for name in layers {
            if !seen.insert(name.as_str()) {
                bail!("duplicate layer name {:?} in {:?} table", name, family);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_verify() {
        verify().unwrap();
    }

    #[test]
    fn test_resnet_tables() {
        assert_eq!(RESNET18.len(), 8);
        assert_eq!(RESNET18.first().unwrap(), "layer1.0.relu");
        assert_eq!(RESNET18.last().unwrap(), "layer4.1.relu");

        assert_eq!(RESNET50.len(), 16);
        assert_eq!(RESNET50[3], "layer2.0.relu");
        assert_eq!(RESNET50.last().unwrap(), "layer4.2.relu");
    }

    #[test]
    fn test_graph_table() {
        assert_eq!(RESNET18_GRAPH.len(), 8);
        assert_eq!(RESNET18_GRAPH.first().unwrap(), "encode_2");
        assert_eq!(RESNET18_GRAPH.last().unwrap(), "encode_9");
    }

    #[test]
    fn test_feature_tables() {
        assert_eq!(
            *ALEXNET,
            ["features.1", "features.4", "features.7", "features.9", "features.11"]
        );
        assert_eq!(VGG16.len(), 6);
        assert_eq!(SQUEEZENET.len(), 5);
        assert_eq!(SQUEEZENET.first().unwrap(), "features.4");
    }
}
