//! Following a material's texture reference down to its image.
//!
//! A diffuse `<texture texture="...">` names a sampler parameter. In
//! COLLADA 1.4 the sampler's `<source>` names a surface parameter whose
//! `<init_from>` holds an image id; in 1.5 the sampler points at the image
//! directly with `<instance_image url="...">`. Some exporters skip the
//! parameters and put the image id in the texture attribute itself.

use crate::elements::{
    Effect, Image, Material, ProfileCommon, Sampler2D, Shader, Surface, Texture, TypedElement,
};

/// Every element visited while resolving a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureBinding<'a> {
    pub texture: Texture<'a>,
    pub sampler: Option<Sampler2D<'a>>,
    pub surface: Option<Surface<'a>>,
    pub image: Image<'a>,
}

impl<'a> TextureBinding<'a> {
    /// File reference of the bound image.
    #[must_use]
    pub fn file(&self) -> Option<&'a str> {
        self.image.init_from()
    }
}

impl<'a> ProfileCommon<'a> {
    /// Resolve a texture reference through this profile's parameters.
    #[must_use]
    pub fn resolve_texture(&self, texture: Texture<'a>) -> Option<TextureBinding<'a>> {
        let reference = texture.texture()?;
        let document = self.node().document();

        let Some(sampler) = self.param(reference).and_then(|p| p.sampler_2d()) else {
            tracing::trace!(%reference, "No sampler parameter, trying image id");
            return Some(TextureBinding {
                texture,
                sampler: None,
                surface: None,
                image: document.resolve(reference)?,
            });
        };

        let (surface, image_ref) = match sampler.source() {
            Some(surface_sid) => {
                let surface = self.param(surface_sid)?.surface()?;
                (Some(surface), surface.init_from()?)
            }
            None => (None, sampler.instance_image_url()?),
        };

        Some(TextureBinding {
            texture,
            sampler: Some(sampler),
            surface,
            image: document.resolve(image_ref)?,
        })
    }
}

impl<'a> Effect<'a> {
    /// The `profile_COMMON` shader, if the effect has one.
    #[must_use]
    pub fn common_shader(&self) -> Option<Shader<'a>> {
        self.profile_common()?.technique()?.shader()
    }

    /// Resolve the diffuse channel's texture.
    #[must_use]
    pub fn diffuse_texture(&self) -> Option<TextureBinding<'a>> {
        let profile = self.profile_common()?;
        let texture = profile.technique()?.shader()?.diffuse()?.texture()?;
        profile.resolve_texture(texture)
    }
}

impl<'a> Material<'a> {
    /// Resolve the diffuse texture of the material's effect.
    #[must_use]
    pub fn diffuse_texture(&self) -> Option<TextureBinding<'a>> {
        self.effect()?.diffuse_texture()
    }

    /// Diffuse color of the material's effect, when it is not textured.
    #[must_use]
    pub fn diffuse_color(&self) -> Option<[f64; 4]> {
        self.effect()?.common_shader()?.diffuse()?.color()?.rgba()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;
    use pretty_assertions::assert_eq;

    const V14: &str = r##"
        <COLLADA xmlns="http://www.collada.org/2005/11/COLLADASchema" version="1.4.1">
          <library_images>
            <image id="brick-img"><init_from>brick.png</init_from></image>
          </library_images>
          <library_effects>
            <effect id="brick-fx">
              <profile_COMMON>
                <newparam sid="brick-surface">
                  <surface type="2D"><init_from>brick-img</init_from></surface>
                </newparam>
                <newparam sid="brick-sampler">
                  <sampler2D><source>brick-surface</source></sampler2D>
                </newparam>
                <technique sid="common">
                  <lambert>
                    <diffuse><texture texture="brick-sampler" texcoord="UV"/></diffuse>
                  </lambert>
                </technique>
              </profile_COMMON>
            </effect>
            <effect id="red-fx">
              <profile_COMMON>
                <technique sid="common">
                  <phong><diffuse><color>1 0 0 1</color></diffuse></phong>
                </technique>
              </profile_COMMON>
            </effect>
            <effect id="direct-fx">
              <profile_COMMON>
                <technique sid="common">
                  <blinn><diffuse><texture texture="brick-img" texcoord="UV"/></diffuse></blinn>
                </technique>
              </profile_COMMON>
            </effect>
            <effect id="broken-fx">
              <profile_COMMON>
                <newparam sid="s"><sampler2D><source>missing-surface</source></sampler2D></newparam>
                <technique sid="common">
                  <phong><diffuse><texture texture="s" texcoord="UV"/></diffuse></phong>
                </technique>
              </profile_COMMON>
            </effect>
          </library_effects>
          <library_materials>
            <material id="brick"><instance_effect url="#brick-fx"/></material>
            <material id="red"><instance_effect url="#red-fx"/></material>
            <material id="direct"><instance_effect url="#direct-fx"/></material>
            <material id="broken"><instance_effect url="#broken-fx"/></material>
          </library_materials>
        </COLLADA>"##;

    const V15: &str = r##"
        <COLLADA xmlns="http://www.collada.org/2008/03/COLLADASchema" version="1.5.0">
          <library_images>
            <image id="wood-img"><init_from><ref>wood.jpg</ref></init_from></image>
          </library_images>
          <library_effects>
            <effect id="wood-fx">
              <profile_COMMON>
                <newparam sid="wood-sampler">
                  <sampler2D><instance_image url="#wood-img"/></sampler2D>
                </newparam>
                <technique sid="common">
                  <phong><diffuse><texture texture="wood-sampler" texcoord="UV"/></diffuse></phong>
                </technique>
              </profile_COMMON>
            </effect>
          </library_effects>
          <library_materials>
            <material id="wood"><instance_effect url="#wood-fx"/></material>
          </library_materials>
        </COLLADA>"##;

    #[test]
    fn test_surface_chain() {
        let doc = Document::parse_str(V14).unwrap();
        let material: Material = doc.resolve("#brick").unwrap();
        let binding = material.diffuse_texture().unwrap();

        assert_eq!(binding.file(), Some("brick.png"));
        assert_eq!(binding.texture.texcoord(), Some("UV"));
        assert_eq!(binding.sampler.and_then(|s| s.source()), Some("brick-surface"));
        assert_eq!(binding.surface.and_then(|s| s.init_from()), Some("brick-img"));
        assert_eq!(material.diffuse_color(), None);
    }

    #[test]
    fn test_instance_image_chain() {
        let doc = Document::parse_str(V15).unwrap();
        let material: Material = doc.resolve("#wood").unwrap();
        let binding = material.diffuse_texture().unwrap();

        assert_eq!(binding.file(), Some("wood.jpg"));
        assert!(binding.sampler.is_some());
        assert!(binding.surface.is_none());
    }

    #[test]
    fn test_texture_naming_image_directly() {
        let doc = Document::parse_str(V14).unwrap();
        let material: Material = doc.resolve("#direct").unwrap();
        let binding = material.diffuse_texture().unwrap();

        assert_eq!(binding.file(), Some("brick.png"));
        assert!(binding.sampler.is_none());
    }

    #[test]
    fn test_color_material() {
        let doc = Document::parse_str(V14).unwrap();
        let material: Material = doc.resolve("#red").unwrap();
        assert!(material.diffuse_texture().is_none());
        assert_eq!(material.diffuse_color(), Some([1.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_broken_chain_is_none() {
        let doc = Document::parse_str(V14).unwrap();
        let material: Material = doc.resolve("#broken").unwrap();
        assert!(material.diffuse_texture().is_none());
    }
}
